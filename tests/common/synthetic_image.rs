use pixelgrid::{ColorMode, ImageBuffer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random low-resolution art blown up by `cell`, shifted by `offset` and padded
/// with `pad` extra pixels on the far edges. Returns the big image and the
/// original `cols × rows` pixels.
pub fn upscaled_art(
    cols: u32,
    rows: u32,
    cell: u32,
    offset: (u32, u32),
    pad: u32,
    mode: ColorMode,
    seed: u64,
) -> (ImageBuffer, Vec<u8>) {
    assert!(cols > 0 && rows > 0 && cell > 0, "art dimensions must be positive");
    let c = mode.channels();
    let mut rng = StdRng::seed_from_u64(seed);
    let art: Vec<u8> = (0..cols * rows * c as u32).map(|_| rng.gen()).collect();

    let width = offset.0 + cols * cell + pad;
    let height = offset.1 + rows * cell + pad;
    let mut data = vec![0u8; (width * height) as usize * c];
    for y in 0..height {
        for x in 0..width {
            let inside = x >= offset.0
                && y >= offset.1
                && x < offset.0 + cols * cell
                && y < offset.1 + rows * cell;
            let idx = (y * width + x) as usize * c;
            if inside {
                let ax = (x - offset.0) / cell;
                let ay = (y - offset.1) / cell;
                let src = (ay * cols + ax) as usize * c;
                data[idx..idx + c].copy_from_slice(&art[src..src + c]);
            } else {
                // Border noise that must never show up in samples.
                data[idx..idx + c].fill(rng.gen());
            }
        }
    }
    let image = ImageBuffer::from_raw(width, height, mode, data).expect("valid synthetic image");
    (image, art)
}

/// Random noise image.
pub fn noise(width: u32, height: u32, mode: ColorMode, seed: u64) -> ImageBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height * mode.channels() as u32).map(|_| rng.gen()).collect();
    ImageBuffer::from_raw(width, height, mode, data).expect("valid noise image")
}

/// RGBA image whose left `clear_cols` columns are fully transparent and the rest opaque red.
pub fn half_transparent(width: u32, height: u32, clear_cols: u32) -> ImageBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            if x < clear_cols {
                data.extend_from_slice(&[17, 34, 51, 0]);
            } else {
                data.extend_from_slice(&[255, 0, 0, 255]);
            }
        }
    }
    ImageBuffer::from_raw(width, height, ColorMode::Rgba, data).expect("valid rgba image")
}
