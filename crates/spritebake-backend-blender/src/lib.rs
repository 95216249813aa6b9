//! spritebake Blender Backend
//!
//! Renders animation frames of a 3D model by running Blender headless as a
//! subprocess, one invocation per frame.
//!
//! # Architecture
//!
//! The backend uses a two-part architecture:
//!
//! 1. **Rust Orchestrator** - Locates Blender, spawns it with the render
//!    script, and reads back a JSON report
//! 2. **Python Script** (`blender/render_frames.py`) - Runs inside Blender to
//!    probe the scene or render a single still
//!
//! The script is embedded at compile time and written to a temp file unless a
//! path is configured.
//!
//! # Example
//!
//! ```ignore
//! use spritebake_backend_blender::{BlenderRenderer, FrameJob};
//! use spritebake_spec::ModelFormat;
//! use std::path::Path;
//!
//! let renderer = BlenderRenderer::default();
//! let scene = renderer.probe_scene(Path::new("walk.blend"), ModelFormat::Blend)?;
//! let frame = renderer.render_frame(&FrameJob {
//!     model: Path::new("walk.blend"),
//!     format: ModelFormat::Blend,
//!     frame: scene.frame_start,
//!     sequence: 0,
//!     size: 128,
//!     output: Path::new("frames/frame_0000.png"),
//!     neutralize_bg: true,
//! })?;
//! ```
//!
//! # Blender Requirements
//!
//! The orchestrator searches for Blender in:
//!
//! 1. The configured path
//! 2. `BLENDER_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations (platform-specific)

pub mod error;
pub mod orchestrator;
pub mod render;
pub mod report;

pub use error::{BlenderError, BlenderResult};
pub use orchestrator::{Invocation, Orchestrator, OrchestratorConfig, ScriptMode};
pub use render::{frame_file_name, BlenderRenderer, FrameJob, RenderedFrame};
pub use report::{BlenderReport, SceneInfo};
