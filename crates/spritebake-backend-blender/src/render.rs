//! Scene probing and per-frame rendering.

use std::path::{Path, PathBuf};
use std::time::Instant;

use spritebake_spec::ModelFormat;

use crate::error::{BlenderError, BlenderResult};
use crate::orchestrator::{Invocation, Orchestrator, OrchestratorConfig, ScriptMode};
use crate::report::{BlenderReport, SceneInfo};

/// Returns the file name for the frame at `sequence` (`frame_0000.png`, ...).
pub fn frame_file_name(sequence: usize) -> String {
    format!("frame_{sequence:04}.png")
}

/// A single frame to render.
#[derive(Debug, Clone)]
pub struct FrameJob<'a> {
    /// Model file to render.
    pub model: &'a Path,
    /// How the model is loaded.
    pub format: ModelFormat,
    /// Animation frame index.
    pub frame: i32,
    /// Position of the frame in the sheet.
    pub sequence: usize,
    /// Square output size in pixels.
    pub size: u32,
    /// Output PNG path.
    pub output: &'a Path,
    /// Make floor/background materials transparent.
    pub neutralize_bg: bool,
}

impl FrameJob<'_> {
    fn script_args(&self) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = vec![
            "--frame".into(),
            self.frame.to_string().into(),
            "--output".into(),
            self.output.as_os_str().to_owned(),
            "--size".into(),
            self.size.to_string().into(),
        ];
        if !self.neutralize_bg {
            args.push("--no-neutralize-bg".into());
        }
        args
    }
}

/// A frame that was rendered to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Animation frame index.
    pub frame: i32,
    /// Position of the frame in the sheet.
    pub sequence: usize,
    /// PNG path.
    pub path: PathBuf,
}

/// Renders animation frames by running Blender once per frame.
pub struct BlenderRenderer {
    orchestrator: Orchestrator,
}

impl BlenderRenderer {
    /// Creates a renderer with the given orchestrator configuration.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            orchestrator: Orchestrator::with_config(config),
        }
    }

    /// Reads the scene's animation range from the model file.
    pub fn probe_scene(&self, model: &Path, format: ModelFormat) -> BlenderResult<SceneInfo> {
        let invocation = Invocation {
            mode: ScriptMode::Probe,
            model,
            format,
            args: Vec::new(),
        };

        let wrap = |source: BlenderError| BlenderError::ProbeFailed {
            model: model.to_path_buf(),
            source: Box::new(source),
        };

        let report = self.orchestrator.run(&invocation).map_err(wrap)?;
        let scene = report.scene.ok_or_else(|| wrap(BlenderError::MissingSceneInfo))?;

        tracing::info!(
            frame_start = scene.frame_start,
            frame_end = scene.frame_end,
            fps = ?scene.fps,
            camera = ?scene.camera,
            "probed scene"
        );
        Ok(scene)
    }

    /// Renders one frame, verifying that the output file exists afterwards.
    ///
    /// Every failure is attributed to the job's frame index.
    pub fn render_frame(&self, job: &FrameJob<'_>) -> BlenderResult<RenderedFrame> {
        let started = Instant::now();
        self.render_unattributed(job)
            .map_err(|e| e.for_frame(job.frame, job.sequence))?;

        tracing::debug!(
            frame = job.frame,
            sequence = job.sequence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered frame"
        );

        Ok(RenderedFrame {
            frame: job.frame,
            sequence: job.sequence,
            path: job.output.to_path_buf(),
        })
    }

    fn render_unattributed(&self, job: &FrameJob<'_>) -> BlenderResult<BlenderReport> {
        let invocation = Invocation {
            mode: ScriptMode::Render,
            model: job.model,
            format: job.format,
            args: job.script_args(),
        };

        let report = self.orchestrator.run(&invocation)?;

        if !job.output.is_file() {
            return Err(BlenderError::OutputNotFound {
                path: job.output.to_path_buf(),
            });
        }
        Ok(report)
    }
}

impl Default for BlenderRenderer {
    fn default() -> Self {
        Self::new(OrchestratorConfig::default())
    }
}
