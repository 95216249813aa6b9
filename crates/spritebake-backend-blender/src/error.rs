//! Error types for the Blender backend.

use spritebake_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for Blender backend operations.
pub type BlenderResult<T> = Result<T, BlenderError>;

/// Errors that can occur while driving Blender.
#[derive(Debug, Error)]
pub enum BlenderError {
    /// Blender executable not found.
    #[error("Blender executable not found. Ensure Blender is installed and in PATH, or set BLENDER_PATH environment variable")]
    BlenderNotFound,

    /// Failed to spawn Blender process.
    #[error("Failed to spawn Blender process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Blender process timed out.
    #[error("Blender process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Blender process exited with non-zero status.
    #[error("Blender process exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// Failed to read report from Blender.
    #[error("Failed to read Blender report from {path}: {source}")]
    ReadReportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse report JSON from Blender.
    #[error("Failed to parse Blender report: {0}")]
    ParseReportFailed(#[source] serde_json::Error),

    /// The render script reported an error.
    #[error("Blender script failed: {message}")]
    ScriptFailed { message: String },

    /// The probe report carried no scene information.
    #[error("Blender report is missing scene information")]
    MissingSceneInfo,

    /// Output file not found after rendering.
    #[error("Expected rendered frame not found: {path}")]
    OutputNotFound { path: PathBuf },

    /// Render script not found.
    #[error("Render script not found at: {path}")]
    ScriptNotFound { path: PathBuf },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading the scene's animation range failed.
    #[error("Failed to probe scene of {model}: {source}")]
    ProbeFailed {
        model: PathBuf,
        #[source]
        source: Box<BlenderError>,
    },

    /// Rendering a specific frame failed.
    #[error("Failed to render frame {frame} (sequence {sequence}): {source}")]
    FrameFailed {
        frame: i32,
        sequence: usize,
        #[source]
        source: Box<BlenderError>,
    },
}

impl BlenderError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new script failed error.
    pub fn script_failed(message: impl Into<String>) -> Self {
        Self::ScriptFailed {
            message: message.into(),
        }
    }

    /// Attributes this error to a frame.
    pub fn for_frame(self, frame: i32, sequence: usize) -> Self {
        Self::FrameFailed {
            frame,
            sequence,
            source: Box::new(self),
        }
    }

    /// Returns the failing frame index, if the error is tied to one.
    pub fn frame(&self) -> Option<i32> {
        match self {
            BlenderError::FrameFailed { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}

impl BackendError for BlenderError {
    fn code(&self) -> &'static str {
        match self {
            BlenderError::BlenderNotFound => "BLENDER_001",
            BlenderError::SpawnFailed(_) => "BLENDER_002",
            BlenderError::Timeout { .. } => "BLENDER_003",
            BlenderError::ProcessFailed { .. } => "BLENDER_004",
            BlenderError::ReadReportFailed { .. } => "BLENDER_005",
            BlenderError::ParseReportFailed(_) => "BLENDER_006",
            BlenderError::ScriptFailed { .. } => "BLENDER_007",
            BlenderError::MissingSceneInfo => "BLENDER_008",
            BlenderError::OutputNotFound { .. } => "BLENDER_009",
            BlenderError::ScriptNotFound { .. } => "BLENDER_010",
            BlenderError::Io(_) => "BLENDER_011",
            BlenderError::ProbeFailed { .. } => "BLENDER_012",
            BlenderError::FrameFailed { .. } => "BLENDER_013",
        }
    }

    fn category(&self) -> &'static str {
        "blender"
    }
}
