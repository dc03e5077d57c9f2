//! bodyscan core library - body-composition classification and health reports

// Global invariants enforced in this crate:
// - Classification is total: every f64 maps to exactly one band, nothing panics
// - No global mutable state
// - The generation date is the only clock input and is always passed in
// - Identical record and date yield byte-for-byte identical documents

pub mod classify;
pub mod config;
pub mod html;
pub mod patient;
pub mod render;
pub mod report;

pub use classify::{classify_all, Metric, Severity, StatusDescriptor};
pub use config::ResolvedConfig;
pub use patient::{Gender, PatientRecord, ValidationError};
pub use render::{ChromeRenderer, DocumentRenderer, PageFormat, RenderError};
pub use report::{assemble_report, render_json, render_text, HealthReport, Organization};

use chrono::NaiveDate;

/// Validate a record and assemble its report
pub fn build_report(
    record: &PatientRecord,
    organization: &Organization,
    generated_on: NaiveDate,
) -> Result<HealthReport, ValidationError> {
    record.validate()?;
    Ok(assemble_report(record, organization, generated_on))
}

/// Render an assembled report to PDF bytes with the given renderer
pub fn render_pdf<R: DocumentRenderer + ?Sized>(
    renderer: &R,
    report: &HealthReport,
    page: &PageFormat,
) -> Result<Vec<u8>, RenderError> {
    let document = html::render_document(report, page);
    renderer.render_pdf(&document)
}
