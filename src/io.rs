//! Loading and saving [`ImageBuffer`]s through the `image` crate.
//!
//! - `load`: decode PNG/JPEG/BMP/GIF/TIFF and normalise to RGB or RGBA.
//! - `save`: encode with the format implied by the extension, PNG otherwise.

use crate::buffer::{BufferError, ImageBuffer};
use image::ImageFormat;
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to decode {}: {source}", path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid pixel data in {}: {source}", path.display())]
    Buffer {
        path: PathBuf,
        #[source]
        source: BufferError,
    },
}

pub fn load(path: impl AsRef<Path>) -> Result<ImageBuffer, ImageError> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| ImageError::DecodeFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let buffer = ImageBuffer::from_dynamic(&decoded).map_err(|source| ImageError::Buffer {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        buffer.width(),
        buffer.height(),
        buffer.mode()
    );
    Ok(buffer)
}

/// Format for `path`: recognised extensions map to their encoder, anything else to PNG.
pub fn output_format(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Png)
}

pub fn save(buffer: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), ImageError> {
    let path = path.as_ref();
    let format = output_format(path);
    let dynamic = buffer.to_dynamic().map_err(|source| ImageError::Buffer {
        path: path.to_path_buf(),
        source,
    })?;
    dynamic
        .save_with_format(path, format)
        .map_err(|source| ImageError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "saved {} ({}x{}, {format:?})",
        path.display(),
        buffer.width(),
        buffer.height()
    );
    Ok(())
}
