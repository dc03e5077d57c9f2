//! End-to-end tests: fixture record -> classification -> report -> document

use bodyscan_core::html::render_document;
use bodyscan_core::patient::load_record;
use bodyscan_core::{
    build_report, render_json, Metric, Organization, PageFormat, Severity, ValidationError,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn golden_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("golden")
        .join(name)
}

fn frozen_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn statuses(fixture: &str) -> Vec<(Metric, String, Severity)> {
    let record = load_record(&fixture_path(fixture)).unwrap();
    let report = build_report(&record, &Organization::default(), frozen_date()).unwrap();
    report
        .metrics
        .into_iter()
        .map(|entry| (entry.metric, entry.status.category, entry.status.severity))
        .collect()
}

#[test]
fn test_jane_doe_matches_golden() {
    let record = load_record(&fixture_path("jane_doe.json")).unwrap();
    let report = build_report(&record, &Organization::default(), frozen_date()).unwrap();

    let actual: serde_json::Value = serde_json::from_str(&render_json(&report)).unwrap();
    let golden = fs::read_to_string(golden_path("jane_doe.json")).unwrap();
    let expected: serde_json::Value = serde_json::from_str(&golden).unwrap();

    assert_eq!(actual, expected);
}

#[test]
fn test_jane_doe_statuses() {
    assert_eq!(
        statuses("jane_doe.json"),
        vec![
            (Metric::Bmi, "Overweight".to_string(), Severity::Elevated),
            (Metric::BodyFat, "Normal".to_string(), Severity::Normal),
            (Metric::VisceralFat, "High".to_string(), Severity::Elevated),
            (Metric::SubcutaneousFat, "Normal".to_string(), Severity::Normal),
            (Metric::SkeletalMuscle, "Normal".to_string(), Severity::Normal),
            (Metric::Bmr, "Normal".to_string(), Severity::Normal),
            (Metric::BodyAge, "Good".to_string(), Severity::Normal),
        ]
    );
}

#[test]
fn test_john_smith_statuses() {
    assert_eq!(
        statuses("john_smith.json"),
        vec![
            (Metric::Bmi, "Obesity grade 3".to_string(), Severity::Risk),
            (Metric::BodyFat, "Risk".to_string(), Severity::Risk),
            (Metric::VisceralFat, "Risk".to_string(), Severity::Risk),
            (Metric::SubcutaneousFat, "High".to_string(), Severity::Elevated),
            (Metric::SkeletalMuscle, "Abnormal".to_string(), Severity::Elevated),
            (Metric::Bmr, "Abnormal".to_string(), Severity::Risk),
            (
                Metric::BodyAge,
                "Needs Improvement".to_string(),
                Severity::Elevated
            ),
        ]
    );
}

#[test]
fn test_john_smith_document() {
    let record = load_record(&fixture_path("john_smith.json")).unwrap();
    let report = build_report(&record, &Organization::default(), frozen_date()).unwrap();
    let html = render_document(&report, &PageFormat::a4());

    assert!(html.contains(r##"<div class="metric-value" style="color: #ef4444">31.1</div>"##));
    assert!(html.contains("98.5 kg"));
    assert!(html.contains("Normal Range: 33-36%"));
    assert!(html.contains("Expected Range: ~1800 kcal/day"));
    assert_eq!(
        record.report_filename("pdf"),
        "Health_Report_John_Smith_2024-11-02.pdf"
    );
}

#[test]
fn test_missing_name_is_rejected() {
    let record = load_record(&fixture_path("missing_name.json")).unwrap();
    let err = build_report(&record, &Organization::default(), frozen_date()).unwrap_err();
    assert_eq!(err, ValidationError::MissingField("name"));
}

#[test]
fn test_deterministic_document() {
    let record = load_record(&fixture_path("jane_doe.json")).unwrap();
    let page = PageFormat::a4();
    let first = render_document(
        &build_report(&record, &Organization::default(), frozen_date()).unwrap(),
        &page,
    );
    let second = render_document(
        &build_report(&record, &Organization::default(), frozen_date()).unwrap(),
        &page,
    );
    assert_eq!(first, second, "Output should be byte-for-byte identical");
}
