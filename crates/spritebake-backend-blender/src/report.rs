//! JSON report written by the render script after every invocation.

use serde::{Deserialize, Serialize};

/// Scene information returned by a probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInfo {
    /// First frame of the scene's animation range.
    pub frame_start: i32,
    /// Last frame of the scene's animation range.
    pub frame_end: i32,
    /// Effective frames per second.
    #[serde(default)]
    pub fps: Option<f64>,
    /// Name of the active camera, if any.
    #[serde(default)]
    pub camera: Option<String>,
}

/// Report written by `render_frames.py`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlenderReport {
    /// Whether the script completed.
    pub ok: bool,
    /// Mode the script ran in.
    #[serde(default)]
    pub mode: Option<String>,
    /// Error message if `ok` is false.
    #[serde(default)]
    pub error: Option<String>,
    /// Scene information (probe mode).
    #[serde(default)]
    pub scene: Option<SceneInfo>,
    /// Frame that was rendered (render mode).
    #[serde(default)]
    pub frame: Option<i32>,
    /// Path the frame was written to (render mode).
    #[serde(default)]
    pub output_path: Option<String>,
    /// Blender version string.
    #[serde(default)]
    pub blender_version: Option<String>,
    /// Wall time spent inside the script.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl BlenderReport {
    /// Parses a report from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
