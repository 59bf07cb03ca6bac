//! Grid calibration - two corners of one perceived pixel give cell size and phase.

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

/// Smallest cell side accepted from a calibration.
pub const MIN_CELL_SIZE: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("selected span of {size}px is too small, pick corners at least {MIN_CELL_SIZE}px apart")]
    TooSmall { size: u32 },
}

/// A point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalibrationPoint {
    pub x: u32,
    pub y: u32,
}

impl CalibrationPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Square sampling grid: cells of `cell_size` starting at `(offset_x, offset_y)`.
///
/// Only obtainable through [`derive_grid`], so `cell_size >= 2` and both offsets
/// lie in `[0, cell_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSpec {
    cell_size: u32,
    offset_x: u32,
    offset_y: u32,
}

impl GridSpec {
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn offset_x(&self) -> u32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> u32 {
        self.offset_y
    }

    /// Number of whole cells (cols, rows) that fit in a `width × height` image.
    pub fn cells_in(&self, width: u32, height: u32) -> (u32, u32) {
        let cols = width.saturating_sub(self.offset_x) / self.cell_size;
        let rows = height.saturating_sub(self.offset_y) / self.cell_size;
        (cols, rows)
    }
}

/// Derive the grid from two clicked corners.
///
/// The cell side is the larger of the two axis spans. The phase is anchored on
/// `first`: swapping the points keeps the size but can move the offset.
pub fn derive_grid(
    first: CalibrationPoint,
    second: CalibrationPoint,
) -> Result<GridSpec, CalibrationError> {
    let dx = second.x.abs_diff(first.x);
    let dy = second.y.abs_diff(first.y);
    let cell_size = dx.max(dy);

    if cell_size < MIN_CELL_SIZE {
        warn!("calibration rejected: span {cell_size}px between {first:?} and {second:?}");
        return Err(CalibrationError::TooSmall { size: cell_size });
    }

    let grid = GridSpec {
        cell_size,
        offset_x: first.x % cell_size,
        offset_y: first.y % cell_size,
    };
    debug!(
        "derived grid: cell={} offset=({}, {})",
        grid.cell_size, grid.offset_x, grid.offset_y
    );
    Ok(grid)
}
