//! Metric classification into status bands
//!
//! Global invariants enforced:
//! - Every classifier is total over `f64`, including NaN and infinities
//! - Bands per metric are contiguous and exhaustive; values falling between
//!   two closed ranges drop to the catch-all band
//! - Male and female reference tables are applied independently

use crate::patient::{Gender, PatientRecord};
use serde::{Deserialize, Serialize};

/// Severity of a classified metric, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Elevated,
    Risk,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Elevated => "elevated",
            Severity::Risk => "risk",
        }
    }

    /// Report color for this severity
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Normal => "#22c55e",
            Severity::Elevated => "#f97316",
            Severity::Risk => "#ef4444",
        }
    }
}

/// Classifier output for a single metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDescriptor {
    pub category: String,
    pub details: String,
    pub severity: Severity,
}

impl StatusDescriptor {
    fn new(category: &str, details: impl Into<String>, severity: Severity) -> Self {
        StatusDescriptor {
            category: category.to_string(),
            details: details.into(),
            severity,
        }
    }

    pub fn color(&self) -> &'static str {
        self.severity.color()
    }
}

/// BMI bands are closed-left, open-right; anything not below 30 (NaN included)
/// lands in the top band.
pub fn classify_bmi(bmi: f64) -> StatusDescriptor {
    if bmi < 18.0 {
        StatusDescriptor::new(
            "Malnutrition 2",
            "Anorexia, Bulimia, Osteoporosis and Break Down of Muscle mass etc.",
            Severity::Risk,
        )
    } else if (18.0..20.0).contains(&bmi) {
        StatusDescriptor::new(
            "Malnutrition 1",
            "Anorexia, Bulimia, Osteoporosis and Break Down of Muscle mass etc.",
            Severity::Elevated,
        )
    } else if (20.0..23.0).contains(&bmi) {
        StatusDescriptor::new(
            "Normal",
            "Normal mensuration, can handle stress, good energy levels, vitality, resistance to illness, good physical condition etc.",
            Severity::Normal,
        )
    } else if (23.0..25.0).contains(&bmi) {
        StatusDescriptor::new(
            "Overweight",
            "Fatigue, digestive problems, circulation problems, varicose veins etc.",
            Severity::Elevated,
        )
    } else if (25.0..28.0).contains(&bmi) {
        StatusDescriptor::new(
            "Obesity grade 1",
            "Diabetes, hypertension, cardiovascular diseases, blood clots, stroke, joint problems/arthritis in knee, spine etc.",
            Severity::Elevated,
        )
    } else if (28.0..30.0).contains(&bmi) {
        StatusDescriptor::new(
            "Obesity grade 2",
            "Diabetes, cancer, angina, heart attacks, arteriolosclerosis & strokes etc.",
            Severity::Risk,
        )
    } else {
        StatusDescriptor::new(
            "Obesity grade 3",
            "Maximum risk of diabetes, cancer, heart disease.",
            Severity::Risk,
        )
    }
}

pub fn classify_body_fat(body_fat: f64, gender: Gender) -> StatusDescriptor {
    let (normal, high, details) = match gender {
        Gender::Male => (
            10.0..=20.0,
            21.0..=25.0,
            "Normal Range: 10-20% | High: 21-25% | Risk: 25%+",
        ),
        Gender::Female => (
            20.0..=30.0,
            31.0..=35.0,
            "Normal Range: 20-30% | High: 31-35% | Risk: 35%+",
        ),
    };

    if normal.contains(&body_fat) {
        StatusDescriptor::new("Normal", details, Severity::Normal)
    } else if high.contains(&body_fat) {
        StatusDescriptor::new("High", details, Severity::Elevated)
    } else {
        StatusDescriptor::new("Risk", details, Severity::Risk)
    }
}

pub fn classify_visceral_fat(visceral_fat: f64) -> StatusDescriptor {
    let details = "Normal: 2-8 | High: 9-14 | Risk: 15+";
    if (2.0..=8.0).contains(&visceral_fat) {
        StatusDescriptor::new("Normal", details, Severity::Normal)
    } else if (9.0..=14.0).contains(&visceral_fat) {
        StatusDescriptor::new("High", details, Severity::Elevated)
    } else {
        StatusDescriptor::new("Risk", details, Severity::Risk)
    }
}

pub fn classify_subcutaneous_fat(subcutaneous_fat: f64) -> StatusDescriptor {
    let details = "Fat found just below the skin. Ideal range: < 15%";
    if subcutaneous_fat < 15.0 {
        StatusDescriptor::new("Normal", details, Severity::Normal)
    } else {
        StatusDescriptor::new("High", details, Severity::Elevated)
    }
}

pub fn classify_skeletal_muscle(skeletal_muscle: f64, gender: Gender) -> StatusDescriptor {
    let (normal, details) = match gender {
        Gender::Male => (33.0..=36.0, "Normal Range: 33-36%"),
        Gender::Female => (30.0..=33.0, "Normal Range: 30-33%"),
    };

    if normal.contains(&skeletal_muscle) {
        StatusDescriptor::new("Normal", details, Severity::Normal)
    } else {
        StatusDescriptor::new("Abnormal", details, Severity::Elevated)
    }
}

/// Reference BMR in kcal/day
pub fn expected_bmr(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 1800.0,
        Gender::Female => 1600.0,
    }
}

/// Percentage deviation of `bmr` from the gender's expected value
pub fn bmr_deviation_percent(bmr: f64, gender: Gender) -> f64 {
    let expected = expected_bmr(gender);
    (bmr - expected).abs() / expected * 100.0
}

pub fn classify_bmr(bmr: f64, gender: Gender) -> StatusDescriptor {
    let details = format!("Expected Range: ~{} kcal/day", expected_bmr(gender));
    let deviation = bmr_deviation_percent(bmr, gender);

    if deviation <= 10.0 {
        StatusDescriptor::new("Normal", details, Severity::Normal)
    } else if deviation <= 20.0 {
        StatusDescriptor::new("Slightly Abnormal", details, Severity::Elevated)
    } else {
        StatusDescriptor::new("Abnormal", details, Severity::Risk)
    }
}

pub fn classify_body_age(body_age: f64, age: f64) -> StatusDescriptor {
    let details = format!(
        "Your body age compared to your chronological age of {} years",
        age
    );
    if body_age <= age {
        StatusDescriptor::new("Good", details, Severity::Normal)
    } else {
        StatusDescriptor::new("Needs Improvement", details, Severity::Elevated)
    }
}

/// The metric families shown in the report, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Bmi,
    BodyFat,
    VisceralFat,
    SubcutaneousFat,
    SkeletalMuscle,
    Bmr,
    BodyAge,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Bmi,
        Metric::BodyFat,
        Metric::VisceralFat,
        Metric::SubcutaneousFat,
        Metric::SkeletalMuscle,
        Metric::Bmr,
        Metric::BodyAge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Bmi => "bmi",
            Metric::BodyFat => "body_fat",
            Metric::VisceralFat => "visceral_fat",
            Metric::SubcutaneousFat => "subcutaneous_fat",
            Metric::SkeletalMuscle => "skeletal_muscle",
            Metric::Bmr => "bmr",
            Metric::BodyAge => "body_age",
        }
    }

    /// Card title in the report
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Bmi => "BMI (Body Mass Index)",
            Metric::BodyFat => "Body Fat (%)",
            Metric::VisceralFat => "Visceral Fat",
            Metric::SubcutaneousFat => "Subcutaneous Fat (%)",
            Metric::SkeletalMuscle => "Skeletal Muscle (%)",
            Metric::Bmr => "BMR (Basal Metabolic Rate)",
            Metric::BodyAge => "Body Age",
        }
    }

    /// Raw value of this metric on a record
    pub fn value(&self, record: &PatientRecord) -> f64 {
        match self {
            Metric::Bmi => record.bmi,
            Metric::BodyFat => record.body_fat,
            Metric::VisceralFat => record.visceral_fat,
            Metric::SubcutaneousFat => record.subcutaneous_fat,
            Metric::SkeletalMuscle => record.skeletal_muscle,
            Metric::Bmr => record.bmr,
            Metric::BodyAge => record.body_age,
        }
    }

    /// Value as printed on the card: BMI to one decimal, percentages suffixed
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Metric::Bmi => format!("{:.1}", value),
            Metric::BodyFat | Metric::SubcutaneousFat | Metric::SkeletalMuscle => {
                format!("{}%", value)
            }
            Metric::VisceralFat | Metric::Bmr | Metric::BodyAge => format!("{}", value),
        }
    }

    /// Run this metric's classifier against a record
    pub fn classify(&self, record: &PatientRecord) -> StatusDescriptor {
        let value = self.value(record);
        match self {
            Metric::Bmi => classify_bmi(value),
            Metric::BodyFat => classify_body_fat(value, record.gender),
            Metric::VisceralFat => classify_visceral_fat(value),
            Metric::SubcutaneousFat => classify_subcutaneous_fat(value),
            Metric::SkeletalMuscle => classify_skeletal_muscle(value, record.gender),
            Metric::Bmr => classify_bmr(value, record.gender),
            Metric::BodyAge => classify_body_age(value, record.age),
        }
    }
}

/// Classify every metric on a record, in report order
pub fn classify_all(record: &PatientRecord) -> Vec<(Metric, StatusDescriptor)> {
    Metric::ALL
        .iter()
        .map(|metric| {
            let status = metric.classify(record);
            log::debug!(
                "{} = {} -> {} ({})",
                metric.as_str(),
                metric.value(record),
                status.category,
                status.severity.as_str()
            );
            (*metric, status)
        })
        .collect()
}

/// Worst severity across a set of classified metrics
pub fn overall_severity(statuses: &[(Metric, StatusDescriptor)]) -> Severity {
    statuses
        .iter()
        .map(|(_, status)| status.severity)
        .max()
        .unwrap_or(Severity::Normal)
}

#[cfg(test)]
mod tests;
