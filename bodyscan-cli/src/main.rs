//! bodyscan CLI - body-composition health report generator

// Global invariants enforced:
// - The record is validated before any report is assembled
// - The wall clock is read once, only for the footer date
// - Renderer failures surface as "report generation failed" with no retry

use anyhow::Context;
use bodyscan_core::config::{self, ResolvedConfig};
use bodyscan_core::html::render_document;
use bodyscan_core::patient::{load_record, PatientRecord};
use bodyscan_core::render::BROWSER_ENV_VARS;
use bodyscan_core::{
    build_report, classify_all, render_json, render_pdf, render_text, ChromeRenderer,
    HealthReport, PageFormat,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bodyscan")]
#[command(about = "Classify body-composition measurements and render a health report")]
#[command(version = env!("BODYSCAN_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a health report from a patient record
    Report {
        /// Patient record JSON file ("-" for stdin)
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "pdf")]
        format: ReportFormat,

        /// Output file path (pdf/html default: <output_dir>/Health_Report_<name>_<date>.<ext>)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report generation date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the status of every metric in a patient record
    Classify {
        /// Patient record JSON file ("-" for stdin)
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: ClassifyFormat,
    },
    /// Validate or show the configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without generating a report
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ReportFormat {
    Pdf,
    Html,
    Json,
    Text,
}

impl ReportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ClassifyFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            format,
            output,
            config: config_path,
            date,
        } => {
            let resolved_config =
                config::load_and_resolve(&std::env::current_dir()?, config_path.as_deref())
                    .context("failed to load configuration")?;

            if let Some(path) = &resolved_config.config_path {
                eprintln!("Using config: {}", path.display());
            }
            log::debug!("resolved config: {:?}", resolved_config);

            let record = load_validated_record(&input)?;
            let generated_on = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            log::debug!("report date: {}", generated_on);
            let report = build_report(&record, &resolved_config.organization, generated_on)?;

            handle_report_output(&record, &report, format, output, &resolved_config)?;
        }
        Commands::Classify { input, format } => {
            let record = load_validated_record(&input)?;
            match format {
                ClassifyFormat::Text => print!("{}", render_classification_text(&record)),
                ClassifyFormat::Json => println!("{}", render_classification_json(&record)?),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let resolved = config::load_and_resolve(&std::env::current_dir()?, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = config::load_and_resolve(&std::env::current_dir()?, path.as_deref())
                    .context("failed to load configuration")?;
                print!("{}", render_config_text(&resolved));
            }
        },
    }

    Ok(())
}

/// Load a record and apply the intake form's required-field checks
fn load_validated_record(input: &Path) -> anyhow::Result<PatientRecord> {
    let record = load_record(input)?;
    record
        .validate()
        .with_context(|| format!("invalid patient record: {}", input.display()))?;
    Ok(record)
}

/// Emit a report in the requested format
fn handle_report_output(
    record: &PatientRecord,
    report: &HealthReport,
    format: ReportFormat,
    output: Option<PathBuf>,
    resolved_config: &ResolvedConfig,
) -> anyhow::Result<()> {
    let default_path = || {
        resolved_config
            .output_dir
            .join(record.report_filename(format.extension()))
    };

    match format {
        ReportFormat::Pdf => {
            log::debug!("rendering PDF with timeout {:?}", resolved_config.render_timeout);
            let renderer = ChromeRenderer::discover(
                resolved_config.chrome_path.as_deref(),
                resolved_config.render_timeout,
            )
            .context("report generation failed")?
            .with_extra_args(resolved_config.extra_args.clone());

            let pdf = render_pdf(&renderer, report, &PageFormat::a4())
                .context("report generation failed")?;

            let output_path = output.unwrap_or_else(default_path);
            write_report(&output_path, &pdf)?;
            eprintln!("PDF report written to: {}", output_path.display());
        }
        ReportFormat::Html => {
            let html = render_document(report, &PageFormat::a4());
            let output_path = output.unwrap_or_else(default_path);
            write_report(&output_path, html.as_bytes())?;
            eprintln!("HTML report written to: {}", output_path.display());
        }
        ReportFormat::Json | ReportFormat::Text => {
            let rendered = match format {
                ReportFormat::Json => format!("{}\n", render_json(report)),
                _ => render_text(report),
            };
            match output {
                Some(output_path) => {
                    write_report(&output_path, rendered.as_bytes())?;
                    eprintln!("Report written to: {}", output_path.display());
                }
                None => print!("{}", rendered),
            }
        }
    }

    Ok(())
}

/// Write report bytes, creating parent directories as needed
fn write_report(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    log::debug!("writing {} bytes to {}", contents.len(), path.display());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory: {}", parent.display())
            })?;
        }
    }

    std::fs::write(path, contents)
        .with_context(|| format!("failed to write report: {}", path.display()))?;

    Ok(())
}

fn render_classification_text(record: &PatientRecord) -> String {
    let mut output = format!(
        "{:<18} {:<10} {:<20} {:<10} {}\n",
        "METRIC", "VALUE", "STATUS", "SEVERITY", "DETAILS"
    );
    for (metric, status) in classify_all(record) {
        output.push_str(&format!(
            "{:<18} {:<10} {:<20} {:<10} {}\n",
            metric.as_str(),
            metric.format_value(metric.value(record)),
            status.category,
            status.severity.as_str(),
            status.details,
        ));
    }
    output
}

fn render_classification_json(record: &PatientRecord) -> anyhow::Result<String> {
    let entries: Vec<serde_json::Value> = classify_all(record)
        .into_iter()
        .map(|(metric, status)| {
            serde_json::json!({
                "metric": metric,
                "value": metric.value(record),
                "status": status,
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("failed to serialize classification")
}

fn render_config_text(resolved: &ResolvedConfig) -> String {
    let mut out = String::from("Configuration:\n");
    match resolved.config_path {
        Some(ref p) => out.push_str(&format!("  Source: {}\n", p.display())),
        None => out.push_str("  Source: defaults (no config file found)\n"),
    }

    let org = &resolved.organization;
    out.push_str("\nOrganization:\n");
    out.push_str(&format!("  name: {}\n", org.name));
    out.push_str(&format!("  address: {}\n", org.address));
    out.push_str(&format!("  phone: {}\n", org.phone));
    out.push_str(&format!("  email: {}\n", org.email));
    out.push_str(&format!("  website: {}\n", org.website));

    out.push_str("\nRenderer:\n");
    out.push_str(&format!(
        "  chrome_path: {}\n",
        resolved
            .chrome_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto-discover".to_string())
    ));
    out.push_str(&format!(
        "  timeout_secs: {}\n",
        resolved.render_timeout.as_secs()
    ));
    if !resolved.extra_args.is_empty() {
        out.push_str(&format!("  extra_args: {}\n", resolved.extra_args.join(" ")));
    }
    for key in BROWSER_ENV_VARS {
        if let Some(value) = std::env::var_os(key).filter(|v| !v.is_empty()) {
            out.push_str(&format!(
                "  env {}: {}\n",
                key,
                Path::new(&value).display()
            ));
        }
    }

    out.push_str(&format!(
        "\nOutput directory: {}\n",
        resolved.output_dir.display()
    ));
    out
}
