//! Options describing a single bake run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::frames::{RangeOverride, DEFAULT_FRAME_COUNT};
use crate::layout::{SheetLayout, DEFAULT_FRAME_SIZE};

/// Model file formats the renderer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// Native Blender scene, opened directly.
    Blend,
    /// Autodesk FBX, imported into an empty scene.
    Fbx,
    /// glTF 2.0 (binary or JSON), imported into an empty scene.
    Gltf,
}

impl ModelFormat {
    /// Detects the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "blend" => Ok(ModelFormat::Blend),
            "fbx" => Ok(ModelFormat::Fbx),
            "glb" | "gltf" => Ok(ModelFormat::Gltf),
            _ => Err(ConfigError::UnsupportedModelFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Returns the identifier passed to the render script.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Blend => "blend",
            ModelFormat::Fbx => "fbx",
            ModelFormat::Gltf => "gltf",
        }
    }
}

/// Which frames the background remover processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatteMode {
    /// Every rendered frame goes through the matting model.
    #[default]
    All,
    /// Empty frames are cleared, already-transparent frames are skipped,
    /// and only the rest go through the matting model.
    Auto,
}

/// Everything a bake run needs to know, independent of the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakeOptions {
    /// Model or animation file to render.
    pub model: PathBuf,
    /// Destination PNG.
    pub output: PathBuf,
    /// Number of frames to select.
    pub frame_count: u32,
    /// Square frame size in pixels.
    pub frame_size: u32,
    /// Grid columns; `None` picks `ceil(sqrt(frames))`.
    pub columns: Option<u32>,
    /// Animation range override.
    pub range: RangeOverride,
    /// Background removal, if enabled.
    pub matte: Option<MatteMode>,
    /// Copy per-frame images next to the output.
    pub keep_frames: bool,
    /// Make floor/background materials transparent before rendering.
    pub neutralize_bg: bool,
}

impl BakeOptions {
    /// Creates options with the default frame count, size and flags.
    pub fn new(model: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            output: output.into(),
            frame_count: DEFAULT_FRAME_COUNT,
            frame_size: DEFAULT_FRAME_SIZE,
            columns: None,
            range: RangeOverride::default(),
            matte: None,
            keep_frames: false,
            neutralize_bg: true,
        }
    }

    /// Checks every option that can be checked without touching the filesystem
    /// or the renderer.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.frame_count == 0 {
            return Err(ConfigError::InvalidFrameCount(self.frame_count));
        }
        self.range.validate()?;
        // Worst case the layout holds every requested frame.
        SheetLayout::compute(self.frame_count, self.columns, self.frame_size)?;

        if self.output.file_name().is_none() {
            return Err(ConfigError::invalid_output_path(
                &self.output,
                "path does not name a file",
            ));
        }
        Ok(())
    }

    /// Directory that receives kept frames: `<output dir>/<output stem>_frames`.
    pub fn kept_frames_dir(&self) -> PathBuf {
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sprite".to_string());
        self.output_dir().join(format!("{stem}_frames"))
    }

    /// Directory the output PNG is written into.
    pub fn output_dir(&self) -> PathBuf {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}
