//! PDF rendering through an external headless browser
//!
//! The HTML document is the contract: page size and margins travel inside it
//! as an `@page` rule, and the renderer only turns it into PDF bytes. One
//! browser process is spawned per render and is always reaped, either by
//! exiting or by being killed at the deadline.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Well-known browser install locations, checked before `$PATH`
const BROWSER_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Windows
    "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
    "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
];

/// Environment variables naming a browser executable, checked in order
/// after the configured path
pub const BROWSER_ENV_VARS: &[&str] = &["PUPPETEER_EXECUTABLE_PATH", "CHROME_PATH"];

/// Executable names looked up on `$PATH`
const BROWSER_NAMES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

/// Flags passed to every browser launch
const BASE_ARGS: &[&str] = &[
    "--headless",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--no-sandbox",
    "--no-first-run",
    "--no-pdf-header-footer",
];

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Errors from the rendering collaborator
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no Chrome or Chromium executable found ({0})")]
    BrowserNotFound(String),
    #[error("failed to launch {binary}")]
    Launch {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("browser did not finish within {0:?}")]
    Timeout(Duration),
    #[error("browser exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("browser produced no PDF output")]
    EmptyOutput,
    #[error("i/o error while rendering")]
    Io(#[from] io::Error),
}

/// Supported paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A4,
    Letter,
}

impl PaperSize {
    pub fn as_css(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::Letter => "letter",
        }
    }
}

/// Page geometry requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub size: PaperSize,
    /// Uniform margin in millimetres (0 = full bleed)
    pub margin_mm: f64,
}

impl PageFormat {
    /// A4 with no margins, the report's native layout
    pub fn a4() -> Self {
        PageFormat {
            size: PaperSize::A4,
            margin_mm: 0.0,
        }
    }

    /// CSS `@page` rule expressing this format
    pub fn css_rule(&self) -> String {
        let margin = if self.margin_mm == 0.0 {
            "0".to_string()
        } else {
            format!("{}mm", self.margin_mm)
        };
        format!("@page {{ size: {}; margin: {}; }}", self.size.as_css(), margin)
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::a4()
    }
}

/// Something that turns a complete HTML document into PDF bytes
pub trait DocumentRenderer {
    fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Renders PDFs with a headless Chrome/Chromium `--print-to-pdf` run
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    binary: PathBuf,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl ChromeRenderer {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        ChromeRenderer {
            binary: binary.into(),
            timeout,
            extra_args: Vec::new(),
        }
    }

    /// Locate a browser: `configured` if given, then `BROWSER_ENV_VARS`, then
    /// well-known install locations, then `$PATH`
    pub fn discover(configured: Option<&Path>, timeout: Duration) -> Result<Self, RenderError> {
        Self::discover_with(configured, timeout, |key| std::env::var_os(key))
    }

    fn discover_with<F>(
        configured: Option<&Path>,
        timeout: Duration,
        env: F,
    ) -> Result<Self, RenderError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let binary = match configured {
            Some(path) if path.is_file() => path.to_path_buf(),
            Some(path) => {
                return Err(RenderError::BrowserNotFound(format!(
                    "configured path {} does not exist",
                    path.display()
                )))
            }
            None => env_override(&env)
                .or_else(find_candidate)
                .or_else(|| find_on_path(env("PATH")))
                .ok_or_else(|| {
                    RenderError::BrowserNotFound(
                        "set renderer.chrome_path in the config file or CHROME_PATH".to_string(),
                    )
                })?,
        };
        log::info!("using browser: {}", binary.display());
        Ok(ChromeRenderer::new(binary, timeout))
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Spawn the browser and wait for it, killing it at the deadline
    fn run(&self, workdir: &Path, input: &Path, output: &Path) -> Result<(), RenderError> {
        let stderr_path = workdir.join("stderr.log");
        let stderr = File::create(&stderr_path)?;

        let mut command = Command::new(&self.binary);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so helper processes can be killed with it
            command.process_group(0);
        }
        command
            .args(BASE_ARGS)
            .arg(format!("--user-data-dir={}", workdir.join("profile").display()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .args(&self.extra_args)
            .arg(file_url(input)?)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr));

        log::debug!("spawning {:?}", command);
        let mut child = command.spawn().map_err(|source| RenderError::Launch {
            binary: self.binary.clone(),
            source,
        })?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                log::warn!(
                    "browser still running after {:?}, killing pid {}",
                    self.timeout,
                    child.id()
                );
                kill_browser(&mut child);
                return Err(RenderError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            let stderr = std::fs::read_to_string(&stderr_path).unwrap_or_default();
            return Err(RenderError::Failed {
                status,
                stderr: last_lines(&stderr, 5),
            });
        }

        Ok(())
    }
}

impl DocumentRenderer for ChromeRenderer {
    fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = tempfile::Builder::new().prefix("bodyscan-").tempdir()?;
        let input = workdir.path().join("report.html");
        let output = workdir.path().join("report.pdf");
        std::fs::write(&input, html)?;

        self.run(workdir.path(), &input, &output)?;

        let bytes = match std::fs::read(&output) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(RenderError::EmptyOutput),
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }

        log::info!("rendered {} byte PDF", bytes.len());
        Ok(bytes)
    }
}

/// Kill the browser and everything in its process group, then reap it
fn kill_browser(child: &mut Child) {
    #[cfg(unix)]
    {
        let pgid = child.id() as libc::pid_t;
        // SAFETY: kill(2) with a negative pid only signals the group created at spawn
        if unsafe { libc::kill(-pgid, libc::SIGKILL) } != 0 {
            log::warn!(
                "failed to kill browser process group {}: {}",
                pgid,
                io::Error::last_os_error()
            );
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = child.kill() {
            log::warn!("failed to kill browser pid {}: {}", child.id(), e);
        }
    }

    if let Err(e) = child.wait() {
        log::warn!("failed to reap browser pid {}: {}", child.id(), e);
    }
}

/// First browser named by an environment variable that exists on disk
fn env_override<F>(env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    for key in BROWSER_ENV_VARS.iter().copied() {
        let Some(value) = env(key).filter(|v| !v.is_empty()) else {
            continue;
        };
        let path = PathBuf::from(value);
        if path.is_file() {
            log::debug!("browser from {}: {}", key, path.display());
            return Some(path);
        }
        log::warn!("{} points to {}, which does not exist", key, path.display());
    }
    None
}

fn find_candidate() -> Option<PathBuf> {
    BROWSER_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
}

/// First browser name that resolves to an executable on `path_var`
fn find_on_path(path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    let cwd = std::env::current_dir().ok()?;
    BROWSER_NAMES
        .iter()
        .find_map(|name| which::which_in(name, Some(&path_var), &cwd).ok())
}

/// Percent-encoded `file://` URL for an absolute local path
fn file_url(path: &Path) -> Result<String, RenderError> {
    url::Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| {
            RenderError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not an absolute path: {}", path.display()),
            ))
        })
}

fn last_lines(s: &str, n: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
