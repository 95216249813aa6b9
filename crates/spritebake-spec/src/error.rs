//! Error types for bake configuration, and the shared backend error trait.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors caused by an invalid combination of bake options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The end of the frame range lies before its start.
    #[error("frame range is empty: end frame {end} is before start frame {start}")]
    InvalidFrameRange { start: i32, end: i32 },

    /// Fewer than one frame was requested.
    #[error("frame count must be at least 1, got {0}")]
    InvalidFrameCount(u32),

    /// Zero grid columns were requested.
    #[error("column count must be at least 1, got {0}")]
    InvalidColumns(u32),

    /// Zero-pixel frames were requested.
    #[error("frame size must be at least 1 pixel, got {0}")]
    InvalidFrameSize(u32),

    /// The composed sheet would not fit in 32-bit image dimensions.
    #[error("sprite sheet of {width}x{height} pixels exceeds the maximum image size")]
    SheetTooLarge { width: u64, height: u64 },

    /// The model file extension is not one the renderer can load.
    #[error("unsupported model format '{extension}' for {path} (expected .blend, .fbx, .glb or .gltf)")]
    UnsupportedModelFormat { path: PathBuf, extension: String },

    /// The output path cannot name a file.
    #[error("invalid output path {path}: {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Creates a new invalid output path error.
    pub fn invalid_output_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidOutputPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Trait implemented by every stage error so the driver can report them uniformly.
///
/// Codes are stable strings like `"CONFIG_001"` or `"BLENDER_004"` and can be
/// matched on programmatically.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category, e.g. "config", "blender", "matte", "sheet".
    fn category(&self) -> &'static str;
}

impl BackendError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidFrameRange { .. } => "CONFIG_001",
            ConfigError::InvalidFrameCount(_) => "CONFIG_002",
            ConfigError::InvalidColumns(_) => "CONFIG_003",
            ConfigError::InvalidFrameSize(_) => "CONFIG_004",
            ConfigError::SheetTooLarge { .. } => "CONFIG_005",
            ConfigError::UnsupportedModelFormat { .. } => "CONFIG_006",
            ConfigError::InvalidOutputPath { .. } => "CONFIG_007",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}
