//! Patient record model and input loading
//!
//! A record is read once per invocation, validated, and then handed to the
//! classifier and report assembler by reference. Nothing mutates it.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Biological sex used to pick reference ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Capitalised form used in the report ("Male" / "Female")
    pub fn display_name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// One set of body-composition measurements for a single patient.
///
/// Field names on the wire follow the intake form (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatientRecord {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub gender: Gender,
    /// Chronological age in years
    pub age: f64,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub bmi: f64,
    /// Body fat, percent
    pub body_fat: f64,
    /// Visceral fat index
    pub visceral_fat: f64,
    /// Subcutaneous fat, percent
    pub subcutaneous_fat: f64,
    /// Skeletal muscle, percent
    pub skeletal_muscle: f64,
    /// Basal metabolic rate, kcal/day
    pub bmr: f64,
    /// Body age in years
    pub body_age: f64,
}

/// A record that failed upstream validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field {field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("field {0} must be a finite number")]
    NotFinite(&'static str),
}

impl PatientRecord {
    /// Check the fields the intake form requires.
    ///
    /// Name must be non-blank and age positive; every measurement must be
    /// finite. Classification itself never needs this, the report does.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        for (field, value) in self.measurements() {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite(field));
            }
        }

        if self.age <= 0.0 {
            return Err(ValidationError::NotPositive {
                field: "age",
                value: self.age,
            });
        }

        Ok(())
    }

    /// All numeric measurements with their wire names, in form order
    pub fn measurements(&self) -> [(&'static str, f64); 10] {
        [
            ("age", self.age),
            ("height", self.height),
            ("weight", self.weight),
            ("bmi", self.bmi),
            ("bodyFat", self.body_fat),
            ("visceralFat", self.visceral_fat),
            ("subcutaneousFat", self.subcutaneous_fat),
            ("skeletalMuscle", self.skeletal_muscle),
            ("bmr", self.bmr),
            ("bodyAge", self.body_age),
        ]
    }

    /// Download name for a rendered report: `Health_Report_<name>_<date>.<ext>`
    pub fn report_filename(&self, extension: &str) -> String {
        format!(
            "Health_Report_{}_{}.{}",
            collapse_whitespace(&self.name),
            self.date.format("%Y-%m-%d"),
            extension
        )
    }
}

/// Replace every run of whitespace with a single underscore
fn collapse_whitespace(s: &str) -> String {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());
    re.replace_all(s, "_").into_owned()
}

/// Parse a patient record from JSON text
pub fn parse_record(json: &str) -> Result<PatientRecord> {
    serde_json::from_str(json).context("failed to parse patient record")
}

/// Load a patient record from a file, or from stdin when `path` is `-`
pub fn load_record(path: &Path) -> Result<PatientRecord> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read patient record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read patient record: {}", path.display()))?
    };

    let record = parse_record(&content)
        .with_context(|| format!("invalid patient record in: {}", path.display()))?;
    log::debug!(
        "loaded patient record for {} dated {}",
        record.name,
        record.date
    );
    Ok(record)
}
