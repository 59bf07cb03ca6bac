//! Owned interleaved 8-bit pixel buffer in RGB or RGBA mode.

use image::{DynamicImage, RgbImage, RgbaImage};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("image dimensions must be non-zero")]
    ZeroDimension,
    #[error("pixel data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Channel layout of an [`ImageBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }
}

/// Immutable row-major image. Processing steps produce new buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    mode: ColorMode,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    pub fn from_raw(
        width: u32,
        height: u32,
        mode: ColorMode,
        pixels: Vec<u8>,
    ) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension);
        }
        let expected = width as usize * height as usize * mode.channels();
        if pixels.len() != expected {
            return Err(BufferError::SizeMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, mode, pixels })
    }

    /// Buffer of `width × height` copies of `color`; `color` must match `mode`'s arity.
    pub fn filled(
        width: u32,
        height: u32,
        mode: ColorMode,
        color: &[u8],
    ) -> Result<Self, BufferError> {
        if color.len() != mode.channels() {
            return Err(BufferError::SizeMismatch { expected: mode.channels(), actual: color.len() });
        }
        let pixels = color.repeat(width as usize * height as usize);
        Self::from_raw(width, height, mode, pixels)
    }

    /// Decode-side normalisation: anything carrying alpha (RGBA, LA, palette
    /// with transparency) becomes RGBA, everything else RGB.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, BufferError> {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let (w, h) = rgba.dimensions();
            Self::from_raw(w, h, ColorMode::Rgba, rgba.into_raw())
        } else {
            let rgb = image.to_rgb8();
            let (w, h) = rgb.dimensions();
            Self::from_raw(w, h, ColorMode::Rgb, rgb.into_raw())
        }
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage, BufferError> {
        let raw = self.pixels.clone();
        let len = raw.len();
        match self.mode {
            ColorMode::Rgb => {
                RgbImage::from_raw(self.width, self.height, raw).map(DynamicImage::ImageRgb8)
            }
            ColorMode::Rgba => {
                RgbaImage::from_raw(self.width, self.height, raw).map(DynamicImage::ImageRgba8)
            }
        }
        .ok_or(BufferError::SizeMismatch {
            expected: self.width as usize * self.height as usize * self.channels(),
            actual: len,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Interleaved channel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Channel tuple at (x, y). Panics when out of bounds, like `image::ImageBuffer::get_pixel`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} image",
            self.width,
            self.height
        );
        let c = self.channels();
        let idx = (y as usize * self.width as usize + x as usize) * c;
        &self.pixels[idx..idx + c]
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }
}
