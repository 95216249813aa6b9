//! Error types for the background removal backend.

use spritebake_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for background removal operations.
pub type MatteResult<T> = Result<T, MatteError>;

/// Errors that can occur while removing frame backgrounds.
#[derive(Debug, Error)]
pub enum MatteError {
    /// The matting model is not installed.
    #[error("rembg not found{}. Install it with `pip install \"rembg[cpu,cli]\"`, put it on PATH, or set REMBG_PATH", searched_suffix(.searched))]
    RembgNotFound { searched: Option<PathBuf> },

    /// Failed to spawn the matting process.
    #[error("Failed to spawn rembg: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The matting process exited with non-zero status.
    #[error("rembg exited with status {exit_code} on {path}: {stderr}")]
    ProcessFailed {
        path: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    /// The matting process produced no image.
    #[error("rembg produced no output for {path}")]
    OutputNotFound { path: PathBuf },

    /// A frame or matted result could not be decoded or encoded.
    #[error("Failed to process image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The matted image does not have the original's dimensions.
    #[error("rembg changed the size of {path} from {expected:?} to {actual:?}")]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn searched_suffix(searched: &Option<PathBuf>) -> String {
    searched
        .as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl MatteError {
    /// Creates a new image error for `path`.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

impl BackendError for MatteError {
    fn code(&self) -> &'static str {
        match self {
            MatteError::RembgNotFound { .. } => "MATTE_001",
            MatteError::SpawnFailed(_) => "MATTE_002",
            MatteError::ProcessFailed { .. } => "MATTE_003",
            MatteError::OutputNotFound { .. } => "MATTE_004",
            MatteError::Image { .. } => "MATTE_005",
            MatteError::DimensionMismatch { .. } => "MATTE_006",
            MatteError::Io(_) => "MATTE_007",
        }
    }

    fn category(&self) -> &'static str {
        "matte"
    }
}
