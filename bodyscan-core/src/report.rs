//! Report assembly and plain output formats
//!
//! Global invariants enforced:
//! - Assembly is a pure function of the record, the organization and the
//!   generation date
//! - Metric entries always appear in `Metric::ALL` order

use crate::classify::{self, Metric, Severity, StatusDescriptor};
use crate::patient::PatientRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "Health Assessment Report";

/// Identity printed in the report header and footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

impl Default for Organization {
    fn default() -> Self {
        Organization {
            name: "Health Assessment Center".to_string(),
            address: "123 Medical Street, Health City, HC 12345".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            email: "info@healthassessment.com".to_string(),
            website: "www.healthassessment.com".to_string(),
        }
    }
}

/// Patient identity block, already formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub date: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
}

/// One classified metric card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub metric: Metric,
    pub name: String,
    pub value: f64,
    pub display_value: String,
    pub status: StatusDescriptor,
}

/// Height and weight, echoed without classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicMeasurements {
    pub height: String,
    pub weight: String,
}

/// Fully assembled health report, ready for any renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub organization: Organization,
    pub title: String,
    pub patient: PatientInfo,
    pub metrics: Vec<MetricEntry>,
    pub basic: BasicMeasurements,
    pub overall: Severity,
    pub generated_on: NaiveDate,
}

impl HealthReport {
    /// Footer date, e.g. "March 15, 2024"
    pub fn generated_on_display(&self) -> String {
        self.generated_on.format("%B %-d, %Y").to_string()
    }

    pub fn metric(&self, metric: Metric) -> Option<&MetricEntry> {
        self.metrics.iter().find(|entry| entry.metric == metric)
    }
}

/// Classify every metric on `record` and assemble the report model
pub fn assemble_report(
    record: &PatientRecord,
    organization: &Organization,
    generated_on: NaiveDate,
) -> HealthReport {
    let statuses = classify::classify_all(record);
    let overall = classify::overall_severity(&statuses);

    let metrics: Vec<MetricEntry> = statuses
        .into_iter()
        .map(|(metric, status)| {
            let value = metric.value(record);
            MetricEntry {
                metric,
                name: metric.display_name().to_string(),
                value,
                display_value: metric.format_value(value),
                status,
            }
        })
        .collect();

    log::debug!(
        "assembled report for {} with {} metrics (overall {})",
        record.name,
        metrics.len(),
        overall.as_str()
    );

    HealthReport {
        organization: organization.clone(),
        title: REPORT_TITLE.to_string(),
        patient: PatientInfo {
            name: record.name.clone(),
            date: record.date.format("%Y-%m-%d").to_string(),
            age: format!("{} years", record.age),
            gender: record.gender.display_name().to_string(),
            phone: record.phone.clone(),
            email: record.email.clone(),
        },
        metrics,
        basic: BasicMeasurements {
            height: format!("{} cm", record.height),
            weight: format!("{} kg", record.weight),
        },
        overall,
        generated_on,
    }
}

/// Render a report as an aligned plain-text table
pub fn render_text(report: &HealthReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", report.title));
    output.push_str(&format!(
        "{} | {} | {} | {}\n\n",
        report.patient.name, report.patient.date, report.patient.age, report.patient.gender
    ));

    output.push_str(&format!(
        "{:<28} {:<10} {:<20} {}\n",
        "METRIC", "VALUE", "STATUS", "SEVERITY"
    ));
    for entry in &report.metrics {
        output.push_str(&format!(
            "{:<28} {:<10} {:<20} {}\n",
            entry.name,
            entry.display_value,
            entry.status.category,
            entry.status.severity.as_str(),
        ));
    }

    output.push_str(&format!(
        "\nHeight: {}  Weight: {}\n",
        report.basic.height, report.basic.weight
    ));
    output.push_str(&format!("Overall: {}\n", report.overall.as_str()));

    output
}

/// Render a report as pretty JSON
pub fn render_json(report: &HealthReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
