//! Frame coverage analysis used to decide which frames need matting.
//!
//! A rendered frame falls into one of three classes:
//!
//! - **Empty**: nothing visible, either almost no opaque pixels or a single
//!   solid color with no subject
//! - **Transparent**: the background is already clear, so all four corners are
//!   transparent and a large share of the frame is too
//! - **NeedsMatte**: anything else, typically a subject on an opaque background

use image::RgbaImage;
use serde::Serialize;

/// Alpha above which a pixel counts as opaque.
const OPAQUE_ALPHA: u8 = 128;
/// Alpha below which a pixel counts as transparent.
const TRANSPARENT_ALPHA: u8 = 10;
/// Fraction of pixels below which content is considered absent.
const EMPTY_THRESHOLD: f64 = 0.001;
/// Per-channel difference that counts as a different color.
const COLOR_TOLERANCE: i16 = 20;
/// Side length of the square sampled at each corner.
const CORNER_SAMPLE: u32 = 3;
/// Minimum transparent fraction of a frame that can skip matting.
const MIN_TRANSPARENT_SHARE: f64 = 0.4;

/// How a frame should be treated by the background remover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameCoverage {
    /// Nothing to keep; replace with a fully transparent frame.
    Empty,
    /// Background is already transparent; leave as is.
    Transparent,
    /// Background is opaque; run the matting model.
    NeedsMatte,
}

/// Classifies a frame.
pub fn classify(image: &RgbaImage) -> FrameCoverage {
    if is_empty_frame(image) {
        FrameCoverage::Empty
    } else if needs_background_removal(image) {
        FrameCoverage::NeedsMatte
    } else {
        FrameCoverage::Transparent
    }
}

/// Returns true if the frame has no visible subject.
pub fn is_empty_frame(image: &RgbaImage) -> bool {
    let total = pixel_count(image);
    if total == 0.0 {
        return true;
    }

    let opaque = image.pixels().filter(|p| p[3] > OPAQUE_ALPHA).count() as f64 / total;
    let transparent = transparent_share(image);

    // A silhouette on a transparent background has content.
    if opaque > EMPTY_THRESHOLD && transparent > 0.5 {
        return false;
    }
    if opaque < EMPTY_THRESHOLD {
        return true;
    }

    // Opaque frame: empty if it is one solid color.
    let reference = image.get_pixel(0, 0);
    let differing = image
        .pixels()
        .filter(|p| {
            (0..3).any(|c| (i16::from(p[c]) - i16::from(reference[c])).abs() > COLOR_TOLERANCE)
        })
        .count() as f64;

    differing / total < EMPTY_THRESHOLD
}

/// Returns true if the frame has an opaque background.
///
/// Frames are only left alone when all four corners are transparent and at
/// least 40% of the frame is transparent.
pub fn needs_background_removal(image: &RgbaImage) -> bool {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return false;
    }

    let cw = CORNER_SAMPLE.min(width);
    let ch = CORNER_SAMPLE.min(height);
    let corners = [
        (0, 0),
        (width - cw, 0),
        (0, height - ch),
        (width - cw, height - ch),
    ];

    for (x0, y0) in corners {
        let mut sum = 0u32;
        for y in y0..y0 + ch {
            for x in x0..x0 + cw {
                sum += u32::from(image.get_pixel(x, y)[3]);
            }
        }
        let mean = f64::from(sum) / f64::from(cw * ch);
        if mean > f64::from(TRANSPARENT_ALPHA) {
            return true;
        }
    }

    transparent_share(image) < MIN_TRANSPARENT_SHARE
}

fn pixel_count(image: &RgbaImage) -> f64 {
    f64::from(image.width()) * f64::from(image.height())
}

fn transparent_share(image: &RgbaImage) -> f64 {
    let total = pixel_count(image);
    if total == 0.0 {
        return 1.0;
    }
    image.pixels().filter(|p| p[3] < TRANSPARENT_ALPHA).count() as f64 / total
}
