//! Background removal over a run's rendered frames.

use std::path::PathBuf;

use image::RgbaImage;
use serde::Serialize;
use spritebake_spec::MatteMode;

use crate::analysis::{classify, FrameCoverage};
use crate::error::{MatteError, MatteResult};
use crate::rembg::BackgroundRemover;

/// What the background remover did across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatteSummary {
    /// Frames passed through the matting model.
    pub matted: usize,
    /// Empty frames replaced with transparent ones.
    pub cleared: usize,
    /// Frames left untouched because their background was already clear.
    pub skipped: usize,
}

/// Removes backgrounds from `frames` one at a time, in order.
///
/// The first failure aborts; frames already processed keep their new content.
pub fn remove_backgrounds(
    remover: &dyn BackgroundRemover,
    frames: &[PathBuf],
    mode: MatteMode,
    mut on_frame: impl FnMut(usize, FrameCoverage),
) -> MatteResult<MatteSummary> {
    let mut summary = MatteSummary::default();

    for (index, frame) in frames.iter().enumerate() {
        let coverage = match mode {
            MatteMode::All => FrameCoverage::NeedsMatte,
            MatteMode::Auto => {
                let image = image::open(frame)
                    .map_err(|e| MatteError::image(frame, e))?
                    .to_rgba8();
                classify(&image)
            }
        };

        match coverage {
            FrameCoverage::NeedsMatte => {
                remover.remove_background(frame)?;
                summary.matted += 1;
            }
            FrameCoverage::Empty => {
                let (width, height) =
                    image::image_dimensions(frame).map_err(|e| MatteError::image(frame, e))?;
                RgbaImage::new(width, height)
                    .save(frame)
                    .map_err(|e| MatteError::image(frame, e))?;
                summary.cleared += 1;
            }
            FrameCoverage::Transparent => summary.skipped += 1,
        }

        tracing::debug!(frame = %frame.display(), ?coverage, "background pass");
        on_frame(index, coverage);
    }

    Ok(summary)
}
