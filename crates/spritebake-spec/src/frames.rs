//! Frame range handling and evenly spaced frame selection.
//!
//! Selection interpolates linearly over the inclusive range and rounds each
//! position half-up to the nearest whole frame, so the first selected frame is
//! always the range start and the last is always the range end.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default number of frames to render.
pub const DEFAULT_FRAME_COUNT: u32 = 8;

/// An inclusive animation frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    start: i32,
    end: i32,
}

impl FrameRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: i32, end: i32) -> ConfigResult<Self> {
        if end < start {
            return Err(ConfigError::InvalidFrameRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First frame of the range.
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last frame of the range.
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of distinct frames in the range.
    pub fn len(&self) -> u64 {
        (i64::from(self.end) - i64::from(self.start) + 1) as u64
    }

    /// Always false; a range holds at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `frame` lies within the range.
    pub fn contains(&self, frame: i32) -> bool {
        (self.start..=self.end).contains(&frame)
    }
}

impl std::fmt::Display for FrameRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// User overrides for either end of the animation range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOverride {
    /// Overrides the scene's first frame.
    pub start: Option<i32>,
    /// Overrides the scene's last frame.
    pub end: Option<i32>,
}

impl RangeOverride {
    /// Creates an override from optional bounds.
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }

    /// Returns the full range if both bounds were given.
    pub fn explicit(&self) -> Option<ConfigResult<FrameRange>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(FrameRange::new(start, end)),
            _ => None,
        }
    }

    /// Returns true if the scene range is needed to fill a missing bound.
    pub fn needs_scene_range(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }

    /// Applies the override on top of the scene's range.
    pub fn resolve(&self, scene: FrameRange) -> ConfigResult<FrameRange> {
        FrameRange::new(
            self.start.unwrap_or(scene.start),
            self.end.unwrap_or(scene.end),
        )
    }

    /// Validates the override alone, before any scene is known.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.explicit() {
            Some(range) => range.map(|_| ()),
            None => Ok(()),
        }
    }
}

/// Evenly spaced frame indices over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSelection {
    range: FrameRange,
    indices: Vec<i32>,
}

impl FrameSelection {
    /// Selects `count` evenly spaced indices over `range`.
    ///
    /// The result always holds exactly `count` non-decreasing indices. When the
    /// range holds fewer than `count` frames some indices repeat; use
    /// [`FrameSelection::unique_indices`] for the frames to actually render.
    pub fn evenly_spaced(range: FrameRange, count: u32) -> ConfigResult<Self> {
        if count == 0 {
            return Err(ConfigError::InvalidFrameCount(count));
        }

        let indices = if count == 1 {
            vec![range.start]
        } else {
            let span = i128::from(range.end) - i128::from(range.start);
            let steps = i128::from(count - 1);
            (0..count)
                .map(|i| {
                    let offset = round_half_up_div(i128::from(i) * span, steps);
                    (i128::from(range.start) + offset) as i32
                })
                .collect()
        };

        Ok(Self { range, indices })
    }

    /// The range the indices were drawn from.
    pub fn range(&self) -> FrameRange {
        self.range
    }

    /// All selected indices, duplicates included.
    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    /// Selected indices with duplicates collapsed, in ascending order.
    pub fn unique_indices(&self) -> Vec<i32> {
        let mut unique = self.indices.clone();
        unique.dedup();
        unique
    }

    /// Returns true if the range was too short and duplicates were produced.
    pub fn is_collapsed(&self) -> bool {
        self.range.len() < self.indices.len() as u64
    }
}

/// `round(numerator / denominator)` with ties rounded up; both operands non-negative.
fn round_half_up_div(numerator: i128, denominator: i128) -> i128 {
    (2 * numerator + denominator) / (2 * denominator)
}
