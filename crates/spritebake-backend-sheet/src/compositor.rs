//! Grid composition of frame images into a sprite sheet.
//!
//! Frames are placed row-major from the top-left cell. Every cell is exactly
//! `cell_size` square; frames of another size are resampled to fit. Cells
//! past the last frame stay fully transparent.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;
use spritebake_spec::SheetLayout;

use crate::error::{SheetError, SheetResult};
use crate::png::{write_atomic, write_rgba_to_vec_with_hash, PngConfig};

/// A sprite sheet written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOutput {
    /// Where the sheet was written.
    pub path: PathBuf,
    /// Sheet width in pixels.
    pub width: u32,
    /// Sheet height in pixels.
    pub height: u32,
    /// BLAKE3 hash of the PNG bytes.
    pub hash: String,
}

/// Loads a frame as RGBA8, resampling it to `cell_size` square if needed.
pub fn load_frame(path: &Path, cell_size: u32) -> SheetResult<RgbaImage> {
    let image = image::open(path)
        .map_err(|source| SheetError::LoadFrame {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    if image.dimensions() == (cell_size, cell_size) {
        return Ok(image);
    }

    tracing::debug!(
        frame = %path.display(),
        from = ?image.dimensions(),
        to = cell_size,
        "resampling frame to cell size"
    );
    Ok(imageops::resize(
        &image,
        cell_size,
        cell_size,
        FilterType::Lanczos3,
    ))
}

/// Composes frames into a transparent canvas according to `layout`.
///
/// Every frame must already be `cell_size` square.
pub fn compose(layout: &SheetLayout, frames: &[RgbaImage]) -> SheetResult<RgbaImage> {
    if frames.len() != layout.frame_count as usize {
        return Err(SheetError::FrameCountMismatch {
            expected: layout.frame_count,
            actual: frames.len(),
        });
    }

    let mut sheet = RgbaImage::new(layout.width(), layout.height());
    for (index, frame) in frames.iter().enumerate() {
        let (x, y) = layout.cell_origin(index as u32);
        // Cells never overlap, so a plain copy keeps each frame's alpha intact.
        imageops::replace(&mut sheet, frame, i64::from(x), i64::from(y));
    }
    Ok(sheet)
}

/// A composed sheet encoded as PNG, not yet on disk.
#[derive(Debug, Clone)]
pub struct EncodedSheet {
    /// Sheet width in pixels.
    pub width: u32,
    /// Sheet height in pixels.
    pub height: u32,
    /// BLAKE3 hash of the PNG bytes.
    pub hash: String,
    data: Vec<u8>,
}

impl EncodedSheet {
    /// Writes the sheet atomically to `output`.
    ///
    /// A failure never leaves a partial sheet behind.
    pub fn write(&self, output: &Path) -> SheetResult<SheetOutput> {
        write_atomic(&self.data, output)?;

        tracing::info!(
            output = %output.display(),
            width = self.width,
            height = self.height,
            bytes = self.data.len(),
            "wrote sprite sheet"
        );

        Ok(SheetOutput {
            path: output.to_path_buf(),
            width: self.width,
            height: self.height,
            hash: self.hash.clone(),
        })
    }
}

/// Loads `frame_paths`, composes them and encodes the sheet in memory.
pub fn encode_sheet(layout: &SheetLayout, frame_paths: &[PathBuf]) -> SheetResult<EncodedSheet> {
    if frame_paths.len() != layout.frame_count as usize {
        return Err(SheetError::FrameCountMismatch {
            expected: layout.frame_count,
            actual: frame_paths.len(),
        });
    }

    let frames = frame_paths
        .iter()
        .map(|path| load_frame(path, layout.cell_size))
        .collect::<SheetResult<Vec<_>>>()?;

    let sheet = compose(layout, &frames)?;
    let (data, hash) = write_rgba_to_vec_with_hash(&sheet, &PngConfig::default())?;

    Ok(EncodedSheet {
        width: sheet.width(),
        height: sheet.height(),
        hash,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn solid(size: u32, index: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([index, 255 - index, 7, 255]))
    }

    #[test]
    fn test_compose_places_frames_row_major() {
        let layout = SheetLayout::compute(8, None, 4).unwrap();
        let frames: Vec<_> = (0..8).map(|i| solid(4, i)).collect();

        let sheet = compose(&layout, &frames).unwrap();

        assert_eq!(sheet.dimensions(), (12, 12));
        for i in 0..8u8 {
            let (x, y) = layout.cell_origin(u32::from(i));
            assert_eq!(sheet.get_pixel(x, y), &Rgba([i, 255 - i, 7, 255]));
            assert_eq!(sheet.get_pixel(x + 3, y + 3), &Rgba([i, 255 - i, 7, 255]));
        }
    }

    #[test]
    fn test_trailing_cells_are_transparent() {
        let layout = SheetLayout::compute(8, None, 4).unwrap();
        let frames: Vec<_> = (0..8).map(|i| solid(4, i)).collect();

        let sheet = compose(&layout, &frames).unwrap();

        // Ninth cell: bottom-right.
        for y in 8..12 {
            for x in 8..12 {
                assert_eq!(sheet.get_pixel(x, y), &Rgba([0, 0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_partial_alpha_is_copied_exactly() {
        let layout = SheetLayout::compute(1, None, 2).unwrap();
        let frame = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 77]));

        let sheet = compose(&layout, &[frame]).unwrap();

        assert_eq!(sheet.get_pixel(1, 1), &Rgba([10, 20, 30, 77]));
    }

    #[test]
    fn test_frame_count_mismatch() {
        let layout = SheetLayout::compute(4, None, 4).unwrap();
        let frames: Vec<_> = (0..3).map(|i| solid(4, i)).collect();

        assert!(matches!(
            compose(&layout, &frames),
            Err(SheetError::FrameCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }
}
