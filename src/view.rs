//! Screen <-> image coordinate mapping under zoom and pan.

use crate::calibrate::CalibrationPoint;
use serde::Serialize;

pub const ZOOM_STEP: f64 = 1.5;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Drawable area in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Used until the collaborator reports a real size.
    pub const DEFAULT: CanvasSize = CanvasSize { width: 800, height: 600 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Falls back to [`CanvasSize::DEFAULT`] for unmeasured (<= 1px) canvases.
    pub fn or_default(self) -> Self {
        if self.width <= 1 || self.height <= 1 {
            Self::DEFAULT
        } else {
            self
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Zoom and pan of the displayed image; `base_scale` fits the image without upscaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    zoom: f64,
    pan_x: i32,
    pan_y: i32,
    base_scale: f64,
}

impl ViewState {
    /// Fresh view (zoom 1, no pan) for an image of `image_size` on `canvas`.
    pub fn fit(canvas: CanvasSize, image_size: (u32, u32)) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0,
            pan_y: 0,
            base_scale: base_scale(canvas, image_size),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> (i32, i32) {
        (self.pan_x, self.pan_y)
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    /// Recompute the base fit after the canvas or image changed; zoom and pan are kept.
    pub fn refit(&mut self, canvas: CanvasSize, image_size: (u32, u32)) {
        self.base_scale = base_scale(canvas, image_size);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0;
        self.pan_y = 0;
    }

    /// Size of the image as drawn, at least 1x1.
    pub fn display_size(&self, image_size: (u32, u32)) -> (u32, u32) {
        let s = self.scale();
        (
            ((image_size.0 as f64 * s).floor() as u32).max(1),
            ((image_size.1 as f64 * s).floor() as u32).max(1),
        )
    }

    /// Shift the view, keeping at least a quarter of the drawn image on the canvas per axis.
    pub fn pan_by(&mut self, dx: i32, dy: i32, canvas: CanvasSize, image_size: (u32, u32)) {
        let (disp_w, disp_h) = self.display_size(image_size);
        self.pan_x = clamp_pan(self.pan_x.saturating_add(dx), disp_w, canvas.width);
        self.pan_y = clamp_pan(self.pan_y.saturating_add(dy), disp_h, canvas.height);
    }

    /// Image pixel under a screen position, clamped into the image.
    pub fn to_image_coords(
        &self,
        screen_x: f64,
        screen_y: f64,
        image_size: (u32, u32),
    ) -> CalibrationPoint {
        let s = self.scale();
        let x = ((screen_x - self.pan_x as f64) / s).floor();
        let y = ((screen_y - self.pan_y as f64) / s).floor();
        CalibrationPoint::new(clamp_coord(x, image_size.0), clamp_coord(y, image_size.1))
    }

    /// Screen position of an image pixel's top-left corner.
    pub fn to_screen_coords(&self, point: CalibrationPoint) -> (i32, i32) {
        let s = self.scale();
        (
            ((point.x as f64 * s).floor() as i32).saturating_add(self.pan_x),
            ((point.y as f64 * s).floor() as i32).saturating_add(self.pan_y),
        )
    }
}

/// `min(canvas_w / img_w, canvas_h / img_h, 1.0)`.
pub fn base_scale(canvas: CanvasSize, image_size: (u32, u32)) -> f64 {
    let canvas = canvas.or_default();
    let sx = canvas.width as f64 / image_size.0.max(1) as f64;
    let sy = canvas.height as f64 / image_size.1.max(1) as f64;
    sx.min(sy).min(1.0)
}

fn clamp_coord(v: f64, extent: u32) -> u32 {
    v.clamp(0.0, extent.saturating_sub(1) as f64) as u32
}

fn clamp_pan(pan: i32, displayed: u32, canvas: u32) -> i32 {
    let keep = (displayed / 4).min(canvas) as i64;
    let lo = keep - displayed as i64;
    let hi = canvas as i64 - keep;
    (pan as i64).clamp(lo, hi) as i32
}
