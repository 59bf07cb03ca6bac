//! Point-sampled downscaling onto a calibrated grid, then nearest-neighbour
//! replication back to cell-sized blocks.
//!
//! Each output cell takes the source pixel at its centre
//! (`offset + index * cell + cell / 2`, clipped to the image). Two execution
//! strategies exist and produce identical bytes:
//!
//! - `Strategy::Direct` walks (row, col) and copies one pixel at a time.
//! - `Strategy::Gather` builds clipped row/column coordinate lists and does a
//!   single `ndarray` fancy-index gather over the whole image.
//!
//! [`resample`] picks `Gather` above [`BULK_THRESHOLD`] cells.

use crate::buffer::{BufferError, ImageBuffer};
use crate::calibrate::GridSpec;
use log::debug;
use ndarray::{ArrayView3, Axis};
use thiserror::Error;

/// Cell count above which the gather path is used.
pub const BULK_THRESHOLD: usize = 10_000;

#[derive(Error, Debug)]
pub enum ResampleError {
    #[error("grid leaves no whole cells ({cols} cols x {rows} rows)")]
    EmptyGrid { cols: u32, rows: u32 },
    #[error("pixel layout error: {0}")]
    Layout(#[from] ndarray::ShapeError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Gather,
}

impl Strategy {
    pub fn for_cells(cells: usize) -> Self {
        if cells > BULK_THRESHOLD {
            Strategy::Gather
        } else {
            Strategy::Direct
        }
    }
}

/// Resample `image` onto `grid`, choosing the strategy by cell count.
pub fn resample(image: &ImageBuffer, grid: &GridSpec) -> Result<ImageBuffer, ResampleError> {
    let (cols, rows) = grid.cells_in(image.width(), image.height());
    resample_with(image, grid, Strategy::for_cells(cols as usize * rows as usize))
}

/// Resample with an explicit strategy.
pub fn resample_with(
    image: &ImageBuffer,
    grid: &GridSpec,
    strategy: Strategy,
) -> Result<ImageBuffer, ResampleError> {
    let reduced = downsample_with(image, grid, strategy)?;
    upscale_nearest(&reduced, grid.cell_size())
}

/// One pixel per grid cell, `cols × rows`, same colour mode as `image`.
pub fn downsample(image: &ImageBuffer, grid: &GridSpec) -> Result<ImageBuffer, ResampleError> {
    let (cols, rows) = grid.cells_in(image.width(), image.height());
    downsample_with(image, grid, Strategy::for_cells(cols as usize * rows as usize))
}

pub fn downsample_with(
    image: &ImageBuffer,
    grid: &GridSpec,
    strategy: Strategy,
) -> Result<ImageBuffer, ResampleError> {
    let (cols, rows) = grid.cells_in(image.width(), image.height());
    if cols == 0 || rows == 0 {
        return Err(ResampleError::EmptyGrid { cols, rows });
    }
    debug!(
        "sampling {cols}x{rows} cells (cell={}, offset=({}, {})) via {strategy:?}",
        grid.cell_size(),
        grid.offset_x(),
        grid.offset_y()
    );

    let xs = sample_coords(cols, grid.offset_x(), grid.cell_size(), image.width());
    let ys = sample_coords(rows, grid.offset_y(), grid.cell_size(), image.height());

    let data = match strategy {
        Strategy::Direct => sample_direct(image, &xs, &ys),
        Strategy::Gather => sample_gather(image, &xs, &ys)?,
    };
    Ok(ImageBuffer::from_raw(cols, rows, image.mode(), data)?)
}

/// Centre coordinate of each cell along one axis, clipped to `extent - 1`.
fn sample_coords(count: u32, offset: u32, cell_size: u32, extent: u32) -> Vec<usize> {
    (0..count)
        .map(|i| (offset + i * cell_size + cell_size / 2).min(extent - 1) as usize)
        .collect()
}

fn sample_direct(image: &ImageBuffer, xs: &[usize], ys: &[usize]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xs.len() * ys.len() * image.channels());
    for &y in ys {
        for &x in xs {
            out.extend_from_slice(image.pixel(x as u32, y as u32));
        }
    }
    out
}

fn sample_gather(image: &ImageBuffer, xs: &[usize], ys: &[usize]) -> Result<Vec<u8>, ResampleError> {
    let shape = (image.height() as usize, image.width() as usize, image.channels());
    let view = ArrayView3::from_shape(shape, image.pixels())?;
    let gathered = view.select(Axis(0), ys).select(Axis(1), xs);
    // `select` may return a non-standard memory layout; iterate in logical order.
    Ok(gathered.iter().copied().collect())
}

/// Replicate each pixel into a `cell_size × cell_size` block.
pub fn upscale_nearest(image: &ImageBuffer, cell_size: u32) -> Result<ImageBuffer, ResampleError> {
    let c = image.channels();
    let cell = cell_size as usize;
    let out_w = image.width() * cell_size;
    let out_h = image.height() * cell_size;
    let mut out = Vec::with_capacity(out_w as usize * out_h as usize * c);

    let mut expanded = Vec::with_capacity(out_w as usize * c);
    for y in 0..image.height() {
        expanded.clear();
        for px in image.row(y).chunks_exact(c) {
            for _ in 0..cell {
                expanded.extend_from_slice(px);
            }
        }
        for _ in 0..cell {
            out.extend_from_slice(&expanded);
        }
    }

    Ok(ImageBuffer::from_raw(out_w, out_h, image.mode(), out)?)
}
