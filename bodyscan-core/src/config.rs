//! Configuration file support for bodyscan
//!
//! Loads the organization identity and renderer settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.bodyscanrc.json` in the working directory
//! 3. `bodyscan.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::report::Organization;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const MAX_TIMEOUT_SECS: u64 = 600;
const DEFAULT_OUTPUT_DIR: &str = ".";

/// bodyscan configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyscanConfig {
    /// Organization identity shown in the report header
    #[serde(default)]
    pub organization: Option<OrganizationConfig>,

    /// PDF renderer settings
    #[serde(default)]
    pub renderer: Option<RendererConfig>,

    /// Directory reports are written to when no --output is given (default: ".")
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Organization identity overrides; unset fields keep the default identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationConfig {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Headless browser settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    /// Browser executable (default: auto-discover)
    pub chrome_path: Option<PathBuf>,
    /// Seconds to wait for a render before killing the browser (default: 60)
    pub timeout_secs: Option<u64>,
    /// Extra flags appended to the browser command line
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub organization: Organization,
    pub chrome_path: Option<PathBuf>,
    pub render_timeout: Duration,
    pub extra_args: Vec<String>,
    pub output_dir: PathBuf,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl BodyscanConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref org) = self.organization {
            if let Some(ref name) = org.name {
                if name.trim().is_empty() {
                    anyhow::bail!("organization.name must not be blank");
                }
            }
            if let Some(ref email) = org.email {
                if !email.contains('@') {
                    anyhow::bail!("organization.email must be an email address (got {})", email);
                }
            }
        }

        if let Some(ref renderer) = self.renderer {
            if let Some(timeout) = renderer.timeout_secs {
                if timeout == 0 || timeout > MAX_TIMEOUT_SECS {
                    anyhow::bail!(
                        "renderer.timeout_secs must be between 1 and {} (got {})",
                        MAX_TIMEOUT_SECS,
                        timeout
                    );
                }
            }
            if let Some(ref path) = renderer.chrome_path {
                if path.as_os_str().is_empty() {
                    anyhow::bail!("renderer.chrome_path must not be empty");
                }
            }
        }

        if let Some(ref dir) = self.output_dir {
            if dir.as_os_str().is_empty() {
                anyhow::bail!("output_dir must not be empty");
            }
        }

        Ok(())
    }

    /// Resolve config into the form used by the report pipeline
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = Organization::default();
        let organization = match &self.organization {
            Some(o) => Organization {
                name: o.name.clone().unwrap_or(defaults.name),
                address: o.address.clone().unwrap_or(defaults.address),
                phone: o.phone.clone().unwrap_or(defaults.phone),
                email: o.email.clone().unwrap_or(defaults.email),
                website: o.website.clone().unwrap_or(defaults.website),
            },
            None => defaults,
        };

        let (chrome_path, timeout_secs, extra_args) = match &self.renderer {
            Some(r) => (
                r.chrome_path.clone(),
                r.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                r.extra_args.clone(),
            ),
            None => (None, DEFAULT_TIMEOUT_SECS, Vec::new()),
        };

        Ok(ResolvedConfig {
            organization,
            chrome_path,
            render_timeout: Duration::from_secs(timeout_secs),
            extra_args,
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        BodyscanConfig::default().resolve()
    }
}

/// Discover and load a config file from `dir`
///
/// Search order:
/// 1. `.bodyscanrc.json`
/// 2. `bodyscan.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(BodyscanConfig, PathBuf)>> {
    for name in [".bodyscanrc.json", "bodyscan.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<BodyscanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: BodyscanConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (BodyscanConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    if let Some(ref path) = resolved.config_path {
        log::debug!("loaded config from {}", path.display());
    }
    Ok(resolved)
}
