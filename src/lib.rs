//! Pixel-art reconstruction from upscaled images by manual grid calibration.
//!
//! The user marks two corners of one perceived "pixel"; [`derive_grid`] turns
//! them into a cell size and phase, and [`resample`] point-samples one source
//! pixel per cell to rebuild a clean block image. [`Session`] ties these to a
//! zoomable, pannable view for interactive front ends.

pub mod buffer;
pub mod calibrate;
pub mod io;
pub mod overlay;
pub mod resample;
pub mod session;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use buffer::{BufferError, ColorMode, ImageBuffer};
pub use calibrate::{derive_grid, CalibrationError, CalibrationPoint, GridSpec};
pub use io::ImageError;
pub use overlay::{composite, render_overlay};
pub use resample::{resample, resample_with, ResampleError, Strategy};
pub use session::{ClickOutcome, Session};
pub use view::{CanvasSize, ViewState};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixelGridError {
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("Resample error: {0}")]
    Resample(#[from] ResampleError),
    #[error("Image error: {0}")]
    Image(#[from] ImageError),
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no grid calibrated yet, select two pixel corners first")]
    NoGrid,
    #[error("no processed image to save")]
    NoResult,
}

pub type Result<T> = std::result::Result<T, PixelGridError>;
