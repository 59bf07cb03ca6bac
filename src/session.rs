//! Interactive calibration session: one source image, its pending corner
//! clicks, the derived grid, the latest result and the view transform.
//!
//! A front end owns one `Session` per open image and drives it with plain
//! method calls; nothing here is shared between sessions.

use crate::buffer::{ColorMode, ImageBuffer};
use crate::calibrate::{derive_grid, CalibrationPoint, GridSpec};
use crate::view::{CanvasSize, ViewState};
use crate::{io, overlay, resample, PixelGridError, Result};
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use log::{debug, info};
use std::path::Path;

/// Above this zoom the display uses nearest-neighbour so pixels stay crisp.
const CRISP_ZOOM: f64 = 2.0;

/// What a canvas click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not in corner-selection mode.
    Ignored,
    /// First corner recorded, waiting for the second.
    FirstCorner(CalibrationPoint),
    /// Both corners in; the grid is ready for processing.
    GridReady(GridSpec),
}

pub struct Session {
    source: ImageBuffer,
    result: Option<ImageBuffer>,
    corners: Vec<CalibrationPoint>,
    selecting: bool,
    grid: Option<GridSpec>,
    canvas: CanvasSize,
    view: ViewState,
}

impl Session {
    pub fn new(source: ImageBuffer) -> Self {
        let canvas = CanvasSize::DEFAULT;
        let view = ViewState::fit(canvas, source.dimensions());
        Self {
            source,
            result: None,
            corners: Vec::with_capacity(2),
            selecting: false,
            grid: None,
            canvas,
            view,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(io::load(path)?))
    }

    pub fn with_canvas(mut self, canvas: CanvasSize) -> Self {
        self.set_canvas(canvas);
        self
    }

    /// Swap in a new source; selection, grid and result are discarded.
    pub fn replace_image(&mut self, source: ImageBuffer) {
        self.source = source;
        self.result = None;
        self.clear_selection();
        self.view.refit(self.canvas, self.source.dimensions());
    }

    pub fn source(&self) -> &ImageBuffer {
        &self.source
    }

    pub fn result(&self) -> Option<&ImageBuffer> {
        self.result.as_ref()
    }

    pub fn grid(&self) -> Option<GridSpec> {
        self.grid
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Start collecting two fresh corners; any pending corner is dropped.
    /// The canvas shows the source again until the next `process`.
    pub fn begin_selection(&mut self) {
        self.selecting = true;
        self.corners.clear();
    }

    /// Feed a canvas click. The second click derives the grid; a too-small
    /// span clears the selection and returns the calibration error.
    pub fn click(&mut self, screen_x: f64, screen_y: f64) -> Result<ClickOutcome> {
        if !self.selecting {
            return Ok(ClickOutcome::Ignored);
        }
        let point = self
            .view
            .to_image_coords(screen_x, screen_y, self.source.dimensions());
        self.corners.push(point);
        debug!("corner {} at image {:?}", self.corners.len(), point);

        if self.corners.len() < 2 {
            return Ok(ClickOutcome::FirstCorner(point));
        }
        let (first, second) = (self.corners[0], self.corners[1]);
        self.selecting = false;
        self.select_points(first, second).map(ClickOutcome::GridReady)
    }

    /// Calibrate directly from image-space corners, bypassing the view.
    pub fn select_points(
        &mut self,
        first: CalibrationPoint,
        second: CalibrationPoint,
    ) -> Result<GridSpec> {
        match derive_grid(first, second) {
            Ok(grid) => {
                self.corners = vec![first, second];
                self.selecting = false;
                self.grid = Some(grid);
                Ok(grid)
            }
            Err(e) => {
                self.clear_selection();
                Err(e.into())
            }
        }
    }

    /// Forget corners, grid and the processed result; the canvas goes back to the source.
    pub fn clear_selection(&mut self) {
        self.corners.clear();
        self.selecting = false;
        self.grid = None;
        self.result = None;
    }

    /// Screen-space segment from the pending first corner to `cursor`.
    pub fn rubber_band(&self, cursor: (i32, i32)) -> Option<((i32, i32), (i32, i32))> {
        match self.corners.as_slice() {
            [first] if self.selecting => Some((self.view.to_screen_coords(*first), cursor)),
            _ => None,
        }
    }

    /// Source with the grid overlay blended on top, or the plain source without a grid.
    pub fn preview(&self) -> Result<ImageBuffer> {
        let Some(grid) = self.grid else {
            return Ok(self.source.clone());
        };
        let (w, h) = self.source.dimensions();
        let layer = overlay::render_overlay(w, h, &grid)?;
        Ok(overlay::composite(&self.source, &layer)?)
    }

    /// Resample the source with the current grid and keep the result.
    pub fn process(&mut self) -> Result<&ImageBuffer> {
        let grid = self.grid.ok_or(PixelGridError::NoGrid)?;
        let out = resample::resample(&self.source, &grid)?;
        info!(
            "processed {}x{} -> {}x{}",
            self.source.width(),
            self.source.height(),
            out.width(),
            out.height()
        );
        Ok(&*self.result.insert(out))
    }

    pub fn save_result(&self, path: impl AsRef<Path>) -> Result<()> {
        let result = self.result.as_ref().ok_or(PixelGridError::NoResult)?;
        io::save(result, path)?;
        Ok(())
    }

    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas.or_default();
        self.view.refit(self.canvas, self.source.dimensions());
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    /// Zoom 1, no pan. Also serves as "fit to window".
    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.view
            .pan_by(dx, dy, self.canvas, self.displayed().dimensions());
    }

    /// Processed result, unless a new selection is under way. Clicks map to
    /// source pixels, so the source must be on show while selecting.
    fn shown_result(&self) -> Option<&ImageBuffer> {
        self.result.as_ref().filter(|_| !self.selecting)
    }

    fn displayed(&self) -> &ImageBuffer {
        self.shown_result().unwrap_or(&self.source)
    }

    /// Pixels for the canvas at the current zoom; transparency is flattened onto white.
    pub fn render_display(&self) -> Result<RgbImage> {
        let shown = match self.shown_result() {
            Some(result) => result.clone(),
            None => self.preview()?,
        };
        let (w, h) = self.view.display_size(shown.dimensions());
        let filter = if self.view.zoom() >= CRISP_ZOOM {
            FilterType::Nearest
        } else {
            FilterType::Lanczos3
        };
        let flat = flatten_on_white(&shown)?;
        Ok(image::imageops::resize(&flat, w, h, filter))
    }
}

fn flatten_on_white(image: &ImageBuffer) -> Result<RgbImage> {
    let dynamic = image.to_dynamic()?;
    if image.mode() == ColorMode::Rgb {
        return Ok(dynamic.into_rgb8());
    }
    let rgba = dynamic.into_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let a = src[3] as u32;
        let mix = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        *dst = Rgb([mix(src[0]), mix(src[1]), mix(src[2])]);
    }
    Ok(out)
}
