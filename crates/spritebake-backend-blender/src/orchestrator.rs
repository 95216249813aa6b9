//! Blender subprocess orchestrator.
//!
//! This module handles locating Blender, spawning it headless with the render
//! script, and reading back the JSON report the script writes.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use spritebake_spec::ModelFormat;

use crate::error::{BlenderError, BlenderResult};
use crate::report::BlenderReport;

const EMBEDDED_RENDER_SCRIPT_PY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../blender/render_frames.py"
));

/// Lines of Blender stderr kept in process failure errors.
const STDERR_TAIL_LINES: usize = 20;

/// Mode the render script runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    /// Report the scene's animation range.
    Probe,
    /// Render a single frame.
    Render,
}

impl ScriptMode {
    /// Returns the string identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptMode::Probe => "probe",
            ScriptMode::Render => "render",
        }
    }
}

/// Configuration for the Blender orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Path to the Blender executable.
    pub blender_path: Option<PathBuf>,
    /// Path to the render script; the embedded copy is used when unset.
    pub script_path: Option<PathBuf>,
    /// Optional timeout per Blender invocation. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Whether to capture Blender's stderr.
    pub capture_output: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            blender_path: None,
            script_path: None,
            timeout: None,
            capture_output: true,
        }
    }
}

impl OrchestratorConfig {
    /// Sets the Blender executable path.
    pub fn blender_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blender_path = Some(path.into());
        self
    }

    /// Sets the render script path.
    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// One invocation of the render script.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// Script mode.
    pub mode: ScriptMode,
    /// Model file to load.
    pub model: &'a Path,
    /// How the model is loaded.
    pub format: ModelFormat,
    /// Mode-specific arguments appended after the common ones.
    pub args: Vec<OsString>,
}

/// The Blender subprocess orchestrator.
pub struct Orchestrator {
    config: OrchestratorConfig,
}

struct ResolvedScript {
    path: PathBuf,
    _tempfile: Option<tempfile::NamedTempFile>,
}

impl Orchestrator {
    /// Creates a new orchestrator with default configuration.
    pub fn new() -> Self {
        Self {
            config: OrchestratorConfig::default(),
        }
    }

    /// Creates a new orchestrator with the given configuration.
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Finds the Blender executable path.
    pub fn find_blender(&self) -> BlenderResult<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.blender_path {
            if path.exists() {
                return Ok(path.clone());
            }
            if let Ok(path) = which::which(path) {
                return Ok(path);
            }
            return Err(BlenderError::BlenderNotFound);
        }

        // Check BLENDER_PATH environment variable
        if let Ok(path) = std::env::var("BLENDER_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        let blender_names = if cfg!(windows) {
            vec!["blender.exe", "blender"]
        } else {
            vec!["blender"]
        };

        for name in blender_names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        let common_paths = if cfg!(windows) {
            vec![
                "C:\\Program Files\\Blender Foundation\\Blender 4.2\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 4.1\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 3.6\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender\\blender.exe",
            ]
        } else if cfg!(target_os = "macos") {
            vec![
                "/Applications/Blender.app/Contents/MacOS/Blender",
                "/Applications/Blender.app/Contents/MacOS/blender",
            ]
        } else {
            vec![
                "/usr/bin/blender",
                "/usr/local/bin/blender",
                "/snap/bin/blender",
            ]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(BlenderError::BlenderNotFound)
    }

    fn resolve_script(&self) -> BlenderResult<ResolvedScript> {
        if let Some(ref path) = self.config.script_path {
            if path.exists() {
                return Ok(ResolvedScript {
                    path: path.clone(),
                    _tempfile: None,
                });
            }
            return Err(BlenderError::ScriptNotFound { path: path.clone() });
        }

        if let Ok(path) = std::env::var("SPRITEBAKE_RENDER_SCRIPT") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(ResolvedScript {
                    path,
                    _tempfile: None,
                });
            }
            return Err(BlenderError::ScriptNotFound { path });
        }

        let mut file = tempfile::Builder::new()
            .prefix("spritebake_render_")
            .suffix(".py")
            .tempfile()?;
        file.write_all(EMBEDDED_RENDER_SCRIPT_PY.as_bytes())?;
        file.flush()?;

        Ok(ResolvedScript {
            path: file.path().to_path_buf(),
            _tempfile: Some(file),
        })
    }

    /// Runs Blender once and returns the script's report.
    ///
    /// A non-zero exit, a missing or unparsable report, or a report with
    /// `ok: false` are all errors.
    pub fn run(&self, invocation: &Invocation<'_>) -> BlenderResult<BlenderReport> {
        let blender_path = self.find_blender()?;
        let script = self.resolve_script()?;

        let temp_dir = tempfile::tempdir()?;
        let report_path = temp_dir.path().join("report.json");

        let mut cmd = build_command(&blender_path, &script.path, invocation, &report_path);

        if self.config.capture_output {
            // Blender is chatty on stdout; only stderr is surfaced in errors.
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        tracing::debug!(command = ?cmd, "spawning Blender");

        let child = cmd.spawn().map_err(BlenderError::SpawnFailed)?;
        let (status, stderr) = wait_for_exit(child, self.config.timeout, self.config.capture_output)?;

        // The script writes a report even when it fails; prefer its message.
        let report = read_report(&report_path);

        if !status.success() {
            if let Ok(BlenderReport {
                error: Some(message),
                ..
            }) = report
            {
                return Err(BlenderError::script_failed(message));
            }
            let exit_code = status.code().unwrap_or(-1);
            return Err(BlenderError::process_failed(exit_code, tail_lines(&stderr)));
        }

        let report = report?;
        if !report.ok {
            return Err(BlenderError::script_failed(
                report.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        Ok(report)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the Blender command line for an invocation.
///
/// `blender --background --factory-startup [model.blend] --python-exit-code 1
/// --python script.py -- --mode <mode> --report <path> [--import <model> --format <fmt>] <args...>`
fn build_command(
    blender_path: &Path,
    script_path: &Path,
    invocation: &Invocation<'_>,
    report_path: &Path,
) -> Command {
    let mut cmd = Command::new(blender_path);
    cmd.arg("--background").arg("--factory-startup");

    if invocation.format == ModelFormat::Blend {
        cmd.arg(invocation.model);
    }

    cmd.arg("--python-exit-code")
        .arg("1")
        .arg("--python")
        .arg(script_path)
        .arg("--")
        .arg("--mode")
        .arg(invocation.mode.as_str())
        .arg("--report")
        .arg(report_path);

    if invocation.format != ModelFormat::Blend {
        cmd.arg("--import")
            .arg(invocation.model)
            .arg("--format")
            .arg(invocation.format.as_str());
    }

    cmd.args(&invocation.args);
    cmd
}

fn read_report(report_path: &Path) -> BlenderResult<BlenderReport> {
    let content =
        std::fs::read_to_string(report_path).map_err(|e| BlenderError::ReadReportFailed {
            path: report_path.to_path_buf(),
            source: e,
        })?;
    BlenderReport::from_json(&content).map_err(BlenderError::ParseReportFailed)
}

fn wait_for_exit(
    mut child: Child,
    timeout: Option<Duration>,
    capture_output: bool,
) -> BlenderResult<(ExitStatus, String)> {
    // Drain stderr on its own thread so a full pipe cannot stall the child.
    let stderr_reader = if capture_output {
        child.stderr.take().map(|mut err| {
            std::thread::spawn(move || {
                let mut buf = String::new();
                let _ = err.read_to_string(&mut buf);
                buf
            })
        })
    } else {
        None
    };

    let status = match timeout {
        None => child.wait().map_err(BlenderError::SpawnFailed)?,
        Some(timeout) => poll_until(&mut child, timeout)?,
    };

    let stderr = stderr_reader
        .map(|reader| reader.join().unwrap_or_default())
        .unwrap_or_default();
    Ok((status, stderr))
}

fn poll_until(child: &mut Child, timeout: Duration) -> BlenderResult<ExitStatus> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BlenderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(BlenderError::SpawnFailed(e)),
        }
    }
}

fn tail_lines(text: &str) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
