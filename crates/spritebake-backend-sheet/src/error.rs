//! Error types for the sheet compositor.

use spritebake_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

use crate::png::PngError;

/// Result type for sheet composition.
pub type SheetResult<T> = Result<T, SheetError>;

/// Errors that can occur while composing or writing a sprite sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The number of frames does not match the layout.
    #[error("layout expects {expected} frames, got {actual}")]
    FrameCountMismatch { expected: u32, actual: usize },

    /// A frame image could not be read or decoded.
    #[error("Failed to load frame {path}: {source}")]
    LoadFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// PNG encoding or output write failed.
    #[error(transparent)]
    Png(#[from] PngError),
}

impl BackendError for SheetError {
    fn code(&self) -> &'static str {
        match self {
            SheetError::FrameCountMismatch { .. } => "SHEET_001",
            SheetError::LoadFrame { .. } => "SHEET_002",
            SheetError::Png(PngError::Io { .. }) => "SHEET_003",
            SheetError::Png(PngError::Encoding(_)) => "SHEET_004",
        }
    }

    fn category(&self) -> &'static str {
        "sheet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SheetError::FrameCountMismatch {
            expected: 8,
            actual: 7,
        };
        assert_eq!(err.to_string(), "layout expects 8 frames, got 7");
        assert_eq!(err.code(), "SHEET_001");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let err = SheetError::from(PngError::Io {
            path: PathBuf::from("/readonly/sheet.png"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(err.to_string().contains("/readonly/sheet.png"));
        assert_eq!(err.code(), "SHEET_003");
    }
}
