//! Semi-transparent grid overlay for calibration feedback.

use crate::buffer::{BufferError, ColorMode, ImageBuffer};
use crate::calibrate::GridSpec;

/// Upper bound on lines drawn per axis; finer grids are only partially drawn.
pub const MAX_LINES_PER_AXIS: usize = 100;

/// Stroke colour, red at half opacity.
pub const LINE_COLOR: [u8; 4] = [255, 0, 0, 128];

/// Line positions along one axis: `offset, offset + cell, ...` below `extent`, capped.
pub fn line_positions(extent: u32, offset: u32, cell_size: u32) -> impl Iterator<Item = u32> {
    (offset..extent)
        .step_by(cell_size.max(1) as usize)
        .take(MAX_LINES_PER_AXIS)
}

/// Render grid lines into a fully transparent RGBA layer of `width × height`.
pub fn render_overlay(width: u32, height: u32, grid: &GridSpec) -> Result<ImageBuffer, BufferError> {
    if width == 0 || height == 0 {
        return Err(BufferError::ZeroDimension);
    }
    let (w, h) = (width as usize, height as usize);
    let mut data = vec![0u8; w * h * 4];

    for x in line_positions(width, grid.offset_x(), grid.cell_size()) {
        for y in 0..h {
            let idx = (y * w + x as usize) * 4;
            data[idx..idx + 4].copy_from_slice(&LINE_COLOR);
        }
    }
    for y in line_positions(height, grid.offset_y(), grid.cell_size()) {
        let start = y as usize * w * 4;
        for px in data[start..start + w * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&LINE_COLOR);
        }
    }

    ImageBuffer::from_raw(width, height, ColorMode::Rgba, data)
}

/// Alpha-blend `overlay` over `base`, keeping `base`'s mode and size.
///
/// Overlay pixels outside `base` are ignored.
pub fn composite(base: &ImageBuffer, overlay: &ImageBuffer) -> Result<ImageBuffer, BufferError> {
    let channels = base.channels();
    let mut out = base.pixels().to_vec();
    let w = base.width().min(overlay.width());
    let h = base.height().min(overlay.height());

    for y in 0..h {
        for x in 0..w {
            let src = overlay.pixel(x, y);
            // RGB overlays count as opaque.
            let a = src.get(3).map_or(255, |&a| a as u32);
            let src_rgb = &src[..3];
            if a == 0 {
                continue;
            }
            let idx = (y as usize * base.width() as usize + x as usize) * channels;
            let dst = &mut out[idx..idx + channels];
            for c in 0..3 {
                dst[c] = blend(src_rgb[c], dst[c], a);
            }
            if channels == 4 {
                dst[3] = (a + (dst[3] as u32 * (255 - a) + 127) / 255).min(255) as u8;
            }
        }
    }

    ImageBuffer::from_raw(base.width(), base.height(), base.mode(), out)
}

fn blend(src: u8, dst: u8, alpha: u32) -> u8 {
    ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
}
