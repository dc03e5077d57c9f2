//! HTML report generation
//!
//! Generates a self-contained HTML document with embedded CSS, sized for
//! printing. No scripts, fonts or images are referenced, so the document
//! renders identically offline.

use crate::classify::Metric;
use crate::render::PageFormat;
use crate::report::{HealthReport, MetricEntry, Organization, PatientInfo};

/// Render a health report as a complete HTML document
pub fn render_document(report: &HealthReport, page: &PageFormat) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {name}</title>
    <style>{page_rule}{css}</style>
</head>
<body>
    <div class="page">
        {header}
        <div class="report-title">{title}</div>
        {patient}
        {metrics}
        {basic}
        {footer}
    </div>
</body>
</html>"#,
        title = html_escape(&report.title),
        name = html_escape(&report.patient.name),
        page_rule = page.css_rule(),
        css = inline_css(),
        header = render_header(&report.organization),
        patient = render_patient_info(&report.patient),
        metrics = render_metrics(&report.metrics),
        basic = render_basic_measurements(report),
        footer = render_footer(report),
    )
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
    color: inherit;
}

html, body {
    -webkit-print-color-adjust: exact;
    print-color-adjust: exact;
}

body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background: #ffffff;
    color: #000000;
}

.page {
    width: 794px;
    min-height: 1123px;
    padding: 20px;
    margin: 0 auto;
}

/* Header */
.header {
    background: linear-gradient(135deg, #2563eb 0%, #1e40af 100%);
    padding: 30px 25px;
    border-radius: 16px 16px 0 0;
    margin-bottom: 25px;
}

.company-name {
    font-size: 32px;
    font-weight: 700;
    color: #ffffff;
    margin-bottom: 8px;
    letter-spacing: -0.5px;
}

.company-details {
    font-size: 13px;
    color: rgba(255, 255, 255, 0.9);
    line-height: 1.8;
}

.report-title {
    text-align: center;
    font-size: 28px;
    font-weight: 700;
    color: #0f172a;
    margin: 35px 0;
}

/* Sections */
.section-container {
    margin-bottom: 25px;
}

.section-title {
    font-size: 20px;
    font-weight: 700;
    color: #0f172a;
    margin-bottom: 18px;
    padding-left: 8px;
    border-left: 5px solid #2563eb;
}

/* Patient information */
.patient-info {
    background: linear-gradient(135deg, #f8fafc 0%, #f1f5f9 100%);
    padding: 25px;
    border-radius: 16px;
    border: 1px solid #e2e8f0;
}

.info-grid,
.metrics-grid,
.basic-metrics {
    display: grid;
    grid-template-columns: 1fr 1fr;
    gap: 18px;
}

.info-item {
    background: #ffffff;
    padding: 14px 18px;
    border-radius: 12px;
    display: flex;
    justify-content: space-between;
    align-items: center;
    border: 1px solid #e2e8f0;
    font-size: 14px;
    font-weight: 600;
}

.info-label {
    color: #475569;
}

.info-value {
    color: #0f172a;
}

/* Metric cards */
.metric-card {
    background: #ffffff;
    border: 2px solid #e2e8f0;
    border-radius: 16px;
    padding: 20px;
    position: relative;
    overflow: hidden;
    break-inside: avoid;
}

.metric-card::before {
    content: '';
    position: absolute;
    top: 0;
    left: 0;
    right: 0;
    height: 4px;
    background: linear-gradient(90deg, #2563eb, #3b82f6);
}

.metric-header {
    display: flex;
    justify-content: space-between;
    align-items: flex-start;
    margin-bottom: 12px;
    gap: 15px;
}

.metric-name {
    font-size: 15px;
    font-weight: 600;
    color: #334155;
    line-height: 1.4;
    flex: 1;
}

.metric-value-container {
    display: flex;
    flex-direction: column;
    align-items: flex-end;
    gap: 6px;
}

.metric-value {
    font-size: 24px;
    font-weight: 700;
    line-height: 1;
}

.metric-status {
    display: inline-block;
    padding: 6px 14px;
    border-radius: 20px;
    font-size: 11px;
    font-weight: 700;
    text-transform: uppercase;
    letter-spacing: 0.5px;
}

.metric-details {
    font-size: 12px;
    color: #64748b;
    margin-top: 12px;
    line-height: 1.6;
    padding-top: 12px;
    border-top: 1px solid #e2e8f0;
}

.bmi-details {
    background: #fef3c7;
    padding: 14px;
    border-radius: 12px;
    margin-top: 12px;
    font-size: 12px;
    line-height: 1.6;
    color: #334155;
    border-left: 4px solid;
}

/* Basic measurements */
.basic-metric-card {
    background: #f8fafc;
    border: 2px solid #e2e8f0;
    border-radius: 16px;
    padding: 18px;
    text-align: center;
}

.basic-metric-label {
    font-size: 13px;
    color: #64748b;
    font-weight: 600;
    margin-bottom: 8px;
    text-transform: uppercase;
    letter-spacing: 0.5px;
}

.basic-metric-value {
    font-size: 28px;
    font-weight: 700;
    color: #0f172a;
}

/* Footer */
footer {
    margin-top: 50px;
    padding: 25px;
    background: #f1f5f9;
    border-radius: 16px;
    text-align: center;
    font-size: 12px;
    color: #64748b;
    border: 1px solid #e2e8f0;
}

footer p {
    margin: 6px 0;
    line-height: 1.6;
}
"#
}

/// Render the organization header
fn render_header(org: &Organization) -> String {
    format!(
        r#"<div class="header">
    <div class="company-name">{name}</div>
    <div class="company-details">
        {address}<br>
        Phone: {phone} | Email: {email}<br>
        Website: {website}
    </div>
</div>"#,
        name = html_escape(&org.name),
        address = html_escape(&org.address),
        phone = html_escape(&org.phone),
        email = html_escape(&org.email),
        website = html_escape(&org.website),
    )
}

fn render_patient_info(patient: &PatientInfo) -> String {
    let items: String = [
        ("Name", &patient.name),
        ("Date", &patient.date),
        ("Age", &patient.age),
        ("Gender", &patient.gender),
        ("Phone", &patient.phone),
        ("Email", &patient.email),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            r#"<div class="info-item">
    <span class="info-label">{label}:</span>
    <span class="info-value">{value}</span>
</div>"#,
            label = label,
            value = html_escape(value),
        )
    })
    .collect();

    format!(
        r#"<div class="section-container">
    <div class="section-title">Patient Information</div>
    <div class="patient-info">
        <div class="info-grid">
            {items}
        </div>
    </div>
</div>"#,
        items = items,
    )
}

fn render_metrics(metrics: &[MetricEntry]) -> String {
    let cards: String = metrics.iter().map(render_metric_card).collect();

    format!(
        r#"<div class="section-container">
    <div class="section-title">Body Composition Analysis</div>
    <div class="metrics-grid">
        {cards}
    </div>
</div>"#,
        cards = cards,
    )
}

fn render_metric_card(entry: &MetricEntry) -> String {
    let color = entry.status.color();

    // BMI carries a health-risk narrative; other metrics show their reference range
    let details = if entry.metric == Metric::Bmi {
        format!(
            r#"<div class="bmi-details" style="border-left-color: {color}">
    <strong>Details:</strong> {details}
</div>"#,
            color = color,
            details = html_escape(&entry.status.details),
        )
    } else {
        format!(
            r#"<div class="metric-details">{}</div>"#,
            html_escape(&entry.status.details)
        )
    };

    format!(
        r#"<div class="metric-card" data-metric="{key}" data-severity="{severity}">
    <div class="metric-header">
        <div class="metric-name">{name}</div>
        <div class="metric-value-container">
            <div class="metric-value" style="color: {color}">{value}</div>
            <div class="metric-status"
                style="background: {color}20; color: {color}">{category}</div>
        </div>
    </div>
    {details}
</div>"#,
        key = entry.metric.as_str(),
        severity = entry.status.severity.as_str(),
        name = html_escape(&entry.name),
        color = color,
        value = html_escape(&entry.display_value),
        category = html_escape(&entry.status.category),
        details = details,
    )
}

fn render_basic_measurements(report: &HealthReport) -> String {
    format!(
        r#"<div class="section-container">
    <div class="section-title">Basic Measurements</div>
    <div class="basic-metrics">
        <div class="basic-metric-card">
            <div class="basic-metric-label">Height</div>
            <div class="basic-metric-value">{height}</div>
        </div>
        <div class="basic-metric-card">
            <div class="basic-metric-label">Weight</div>
            <div class="basic-metric-value">{weight}</div>
        </div>
    </div>
</div>"#,
        height = html_escape(&report.basic.height),
        weight = html_escape(&report.basic.weight),
    )
}

/// Render footer
fn render_footer(report: &HealthReport) -> String {
    format!(
        r#"<footer>
    <p><strong>Report Generated:</strong> {date}</p>
    <p>For any queries, please contact us at {email}</p>
</footer>"#,
        date = report.generated_on_display(),
        email = html_escape(&report.organization.email),
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
