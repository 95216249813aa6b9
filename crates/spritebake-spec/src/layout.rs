//! Sprite sheet grid layout.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default per-frame square size in pixels.
pub const DEFAULT_FRAME_SIZE: u32 = 128;

/// Grid geometry of a sprite sheet.
///
/// Frames fill cells row-major from the top-left. The last row may hold
/// blank cells but is never entirely blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Number of frames placed on the sheet.
    pub frame_count: u32,
    /// Cells per row.
    pub columns: u32,
    /// Rows of cells.
    pub rows: u32,
    /// Side length of each square cell in pixels.
    pub cell_size: u32,
}

impl SheetLayout {
    /// Computes the layout for `frame_count` frames.
    ///
    /// `columns` defaults to `ceil(sqrt(frame_count))`.
    pub fn compute(frame_count: u32, columns: Option<u32>, cell_size: u32) -> ConfigResult<Self> {
        if frame_count == 0 {
            return Err(ConfigError::InvalidFrameCount(frame_count));
        }
        if cell_size == 0 {
            return Err(ConfigError::InvalidFrameSize(cell_size));
        }
        let columns = match columns {
            Some(0) => return Err(ConfigError::InvalidColumns(0)),
            Some(columns) => columns,
            None => ceil_sqrt(frame_count),
        };
        let rows = frame_count.div_ceil(columns);

        let layout = Self {
            frame_count,
            columns,
            rows,
            cell_size,
        };

        let width = u64::from(columns) * u64::from(cell_size);
        let height = u64::from(rows) * u64::from(cell_size);
        if width > u64::from(u32::MAX) || height > u64::from(u32::MAX) {
            return Err(ConfigError::SheetTooLarge { width, height });
        }

        Ok(layout)
    }

    /// Sheet width in pixels.
    pub fn width(&self) -> u32 {
        self.columns * self.cell_size
    }

    /// Sheet height in pixels.
    pub fn height(&self) -> u32 {
        self.rows * self.cell_size
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Number of trailing cells left blank.
    pub fn blank_cells(&self) -> u64 {
        self.cell_count() - u64::from(self.frame_count)
    }

    /// Pixel origin (x, y) of the cell holding frame `index`.
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        let column = index % self.columns;
        let row = index / self.columns;
        (column * self.cell_size, row * self.cell_size)
    }
}

/// Smallest `c` such that `c * c >= n`.
fn ceil_sqrt(n: u32) -> u32 {
    let mut root = f64::from(n).sqrt() as u32;
    while u64::from(root) * u64::from(root) < u64::from(n) {
        root += 1;
    }
    while root > 1 && u64::from(root - 1) * u64::from(root - 1) >= u64::from(n) {
        root -= 1;
    }
    root.max(1)
}
