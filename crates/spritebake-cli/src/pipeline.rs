//! The bake pipeline: model file in, sprite sheet out.
//!
//! Stages run strictly in order and every failure is fatal:
//!
//! 1. input checks (options, input file, model format)
//! 2. frame range resolution, frame selection and layout
//! 3. rendering into a temporary working directory
//! 4. optional background removal
//! 5. compositing and PNG encoding in memory
//! 6. optional frame retention
//! 7. the atomic sheet write
//!
//! The sheet is written last, so a failed run never leaves one behind.
//!
//! The working directory is removed when [`run_bake`] returns, whether it
//! succeeded or not.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use spritebake_backend_blender::{
    frame_file_name, BlenderError, BlenderRenderer, BlenderResult, FrameJob, RenderedFrame,
    SceneInfo,
};
use spritebake_backend_matte::{
    remove_backgrounds, BackgroundRemover, FrameCoverage, MatteError, MatteSummary,
};
use spritebake_backend_sheet::{encode_sheet, SheetError, SheetOutput};
use spritebake_spec::{
    BackendError, BakeOptions, ConfigError, FrameRange, FrameSelection, ModelFormat, SheetLayout,
};
use thiserror::Error;

/// Result type for a bake run.
pub type BakeResult<T> = Result<T, BakeError>;

/// A failed bake run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] BlenderError),

    #[error(transparent)]
    BackgroundRemoval(#[from] MatteError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl BakeError {
    /// Creates an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Names the pipeline stage the error came from.
    pub fn stage(&self) -> &'static str {
        match self {
            BakeError::Config(_) => "configuration",
            BakeError::Render(_) => "render",
            BakeError::BackgroundRemoval(_) => "background removal",
            BakeError::Io { .. } | BakeError::Sheet(_) => "io",
        }
    }

    /// Stable error code of the underlying stage error.
    pub fn code(&self) -> &'static str {
        match self {
            BakeError::Config(e) => e.code(),
            BakeError::Render(e) => e.code(),
            BakeError::BackgroundRemoval(e) => e.code(),
            BakeError::Io { .. } => "IO_001",
            BakeError::Sheet(e) => e.code(),
        }
    }
}

/// Source of rendered frames.
///
/// [`BlenderRenderer`] is the real implementation; tests substitute their own.
pub trait FrameRenderer {
    /// Reads the scene's animation range and metadata.
    fn probe_scene(&self, model: &Path, format: ModelFormat) -> BlenderResult<SceneInfo>;

    /// Renders a single frame to `job.output`.
    fn render_frame(&self, job: &FrameJob<'_>) -> BlenderResult<RenderedFrame>;
}

impl FrameRenderer for BlenderRenderer {
    fn probe_scene(&self, model: &Path, format: ModelFormat) -> BlenderResult<SceneInfo> {
        BlenderRenderer::probe_scene(self, model, format)
    }

    fn render_frame(&self, job: &FrameJob<'_>) -> BlenderResult<RenderedFrame> {
        BlenderRenderer::render_frame(self, job)
    }
}

/// Progress notifications emitted while a bake runs.
#[derive(Debug)]
pub enum BakeEvent<'a> {
    /// The frame range is known.
    RangeResolved { range: FrameRange, probed: bool },
    /// Frames were selected and the sheet laid out.
    Planned {
        selection: &'a FrameSelection,
        layout: &'a SheetLayout,
    },
    /// One frame finished rendering.
    FrameRendered {
        frame: &'a RenderedFrame,
        total: usize,
    },
    /// One frame went through the background pass.
    FrameMatted {
        index: usize,
        total: usize,
        coverage: FrameCoverage,
    },
    /// The sheet was written.
    SheetWritten { sheet: &'a SheetOutput },
    /// Frames were copied next to the output.
    FramesKept { dir: &'a Path, count: usize },
}

/// Summary of a successful bake run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BakeOutcome {
    /// Input model.
    pub model: PathBuf,
    /// Written sprite sheet.
    pub output: PathBuf,
    /// Animation range frames were selected from.
    pub range: FrameRange,
    /// Rendered frame indices, in sheet order.
    pub frames: Vec<i32>,
    /// Grid geometry of the sheet.
    pub layout: SheetLayout,
    /// Sheet width in pixels.
    pub width: u32,
    /// Sheet height in pixels.
    pub height: u32,
    /// BLAKE3 hash of the written PNG.
    pub hash: String,
    /// Directory holding kept frames, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kept_frames: Option<PathBuf>,
    /// Background removal summary, if enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matte: Option<MatteSummary>,
    /// Wall time of the whole run.
    pub duration_ms: u64,
}

/// Checks everything that can fail before any external tool runs.
///
/// Returns the detected model format.
pub fn check_inputs(options: &BakeOptions) -> BakeResult<ModelFormat> {
    options.validate()?;

    if !options.model.is_file() {
        return Err(BakeError::io(
            format!("input file {}", options.model.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }

    Ok(ModelFormat::from_path(&options.model)?)
}

/// Runs a bake after [`check_inputs`] succeeded.
///
/// `remover` must be provided when `options.matte` is set.
pub fn run_bake(
    options: &BakeOptions,
    format: ModelFormat,
    renderer: &dyn FrameRenderer,
    remover: Option<&dyn BackgroundRemover>,
    mut on_event: impl FnMut(BakeEvent<'_>),
) -> BakeResult<BakeOutcome> {
    let started = Instant::now();

    let matte = match (options.matte, remover) {
        (Some(mode), Some(remover)) => Some((mode, remover)),
        (Some(_), None) => return Err(MatteError::RembgNotFound { searched: None }.into()),
        (None, _) => None,
    };

    let (range, probed) = resolve_range(options, format, renderer)?;
    tracing::info!(%range, probed, "resolved frame range");
    on_event(BakeEvent::RangeResolved { range, probed });

    let selection = FrameSelection::evenly_spaced(range, options.frame_count)?;
    let frames = selection.unique_indices();
    if selection.is_collapsed() {
        tracing::warn!(
            requested = options.frame_count,
            rendered = frames.len(),
            %range,
            "range is shorter than the requested frame count; duplicate frames dropped"
        );
    }
    let layout = SheetLayout::compute(frames.len() as u32, options.columns, options.frame_size)?;
    on_event(BakeEvent::Planned {
        selection: &selection,
        layout: &layout,
    });

    let workdir = tempfile::Builder::new()
        .prefix("spritebake_")
        .tempdir()
        .map_err(|e| BakeError::io("failed to create working directory", e))?;
    tracing::debug!(workdir = %workdir.path().display(), "created working directory");

    let mut frame_paths = Vec::with_capacity(frames.len());
    for (sequence, &frame) in frames.iter().enumerate() {
        let output = workdir.path().join(frame_file_name(sequence));
        let rendered = renderer.render_frame(&FrameJob {
            model: &options.model,
            format,
            frame,
            sequence,
            size: options.frame_size,
            output: &output,
            neutralize_bg: options.neutralize_bg,
        })?;
        on_event(BakeEvent::FrameRendered {
            frame: &rendered,
            total: frames.len(),
        });
        frame_paths.push(rendered.path);
    }

    let matte_summary = match matte {
        Some((mode, remover)) => {
            let total = frame_paths.len();
            let summary = remove_backgrounds(remover, &frame_paths, mode, |index, coverage| {
                on_event(BakeEvent::FrameMatted {
                    index,
                    total,
                    coverage,
                })
            })?;
            tracing::info!(
                matted = summary.matted,
                cleared = summary.cleared,
                skipped = summary.skipped,
                "background removal finished"
            );
            Some(summary)
        }
        None => None,
    };

    let encoded = encode_sheet(&layout, &frame_paths)?;

    let kept_frames = if options.keep_frames {
        let dir = options.kept_frames_dir();
        keep_frames(&frame_paths, &dir)?;
        on_event(BakeEvent::FramesKept {
            dir: &dir,
            count: frame_paths.len(),
        });
        Some(dir)
    } else {
        None
    };

    let sheet = encoded.write(&options.output)?;
    on_event(BakeEvent::SheetWritten { sheet: &sheet });

    Ok(BakeOutcome {
        model: options.model.clone(),
        output: sheet.path,
        range,
        frames,
        layout,
        width: sheet.width,
        height: sheet.height,
        hash: sheet.hash,
        kept_frames,
        matte: matte_summary,
        duration_ms: started.elapsed().as_millis() as u64,
    })
}

/// Uses the explicit range when both bounds are given, otherwise probes the
/// scene and fills in the missing bounds.
fn resolve_range(
    options: &BakeOptions,
    format: ModelFormat,
    renderer: &dyn FrameRenderer,
) -> BakeResult<(FrameRange, bool)> {
    if let Some(range) = options.range.explicit() {
        return Ok((range?, false));
    }

    let scene = renderer.probe_scene(&options.model, format)?;
    let scene_range = FrameRange::new(scene.frame_start, scene.frame_end)?;
    Ok((options.range.resolve(scene_range)?, true))
}

/// Copies frames into `dir`, replacing files of the same name.
fn keep_frames(frames: &[PathBuf], dir: &Path) -> BakeResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| BakeError::io(format!("failed to create {}", dir.display()), e))?;

    for frame in frames {
        let Some(name) = frame.file_name() else {
            continue;
        };
        let target = dir.join(name);
        std::fs::copy(frame, &target).map_err(|e| {
            BakeError::io(format!("failed to copy frame to {}", target.display()), e)
        })?;
    }
    Ok(())
}
