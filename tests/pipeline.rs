mod common;

use common::synthetic_image::{half_transparent, noise, upscaled_art};
use pixelgrid::resample::downsample;
use pixelgrid::{
    derive_grid, resample, CalibrationError, CalibrationPoint, ColorMode, GridSpec, ImageBuffer,
    ResampleError,
};

fn grid(first: (u32, u32), second: (u32, u32)) -> GridSpec {
    derive_grid(
        CalibrationPoint::new(first.0, first.1),
        CalibrationPoint::new(second.0, second.1),
    )
    .expect("valid calibration")
}

#[test]
fn recovers_original_art_from_upscale() {
    let _ = env_logger::builder().is_test(true).try_init();
    for mode in [ColorMode::Rgb, ColorMode::Rgba] {
        let (image, art) = upscaled_art(12, 9, 7, (3, 5), 4, mode, 11);
        let g = grid((3, 5), (10, 12));
        let small = downsample(&image, &g).unwrap();
        assert_eq!(small.dimensions(), (12, 9));
        assert_eq!(small.pixels(), &art[..]);

        let big = resample(&image, &g).unwrap();
        assert_eq!(big.dimensions(), (84, 63));
        assert_eq!(big.mode(), mode);
    }
}

#[test]
fn hundred_pixel_scenario() {
    let image = noise(100, 100, ColorMode::Rgb, 1);
    let g = grid((10, 10), (30, 10));
    assert_eq!((g.cell_size(), g.offset_x(), g.offset_y()), (20, 10, 10));
    let out = resample(&image, &g).unwrap();
    assert_eq!(out.dimensions(), (80, 80));
}

#[test]
fn single_pixel_span_is_rejected() {
    let err = derive_grid(CalibrationPoint::new(5, 5), CalibrationPoint::new(6, 6)).unwrap_err();
    assert_eq!(err, CalibrationError::TooSmall { size: 1 });
}

#[test]
fn output_dimensions_follow_cell_formula() {
    let image = noise(137, 91, ColorMode::Rgba, 2);
    for (first, second) in [((0, 0), (2, 0)), ((4, 9), (9, 3)), ((50, 13), (13, 50)), ((88, 1), (1, 1))] {
        let g = grid(first, second);
        let cols = (137 - g.offset_x()) / g.cell_size();
        let rows = (91 - g.offset_y()) / g.cell_size();
        match resample(&image, &g) {
            Ok(out) => assert_eq!(out.dimensions(), (cols * g.cell_size(), rows * g.cell_size())),
            Err(ResampleError::EmptyGrid { .. }) => assert!(cols == 0 || rows == 0),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn offset_past_last_whole_cell_is_empty() {
    let image = noise(30, 30, ColorMode::Rgb, 3);
    let g = grid((0, 20), (25, 20));
    assert_eq!((g.cell_size(), g.offset_y()), (25, 20));
    assert!(matches!(
        resample(&image, &g),
        Err(ResampleError::EmptyGrid { cols: 1, rows: 0 })
    ));
}

#[test]
fn resampling_own_output_is_stable() {
    let image = noise(64, 48, ColorMode::Rgba, 4);
    let g = grid((2, 3), (7, 3));
    let once = resample(&image, &g).unwrap();
    let aligned = grid((0, 0), (g.cell_size(), 0));
    let twice = resample(&once, &aligned).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn transparent_source_stays_transparent() {
    let clear = ImageBuffer::filled(50, 50, ColorMode::Rgba, &[0, 0, 0, 0]).unwrap();
    let g = grid((3, 3), (9, 3));
    let out = resample(&clear, &g).unwrap();
    assert_eq!(out.mode(), ColorMode::Rgba);
    assert_eq!(out.dimensions(), (42, 42));
    assert!(out.pixels().chunks_exact(4).all(|p| p == [0, 0, 0, 0]));
}

#[test]
fn alpha_survives_per_cell() {
    let image = half_transparent(40, 20, 20);
    let g = grid((0, 0), (5, 0));
    let out = resample(&image, &g).unwrap();
    for y in 0..out.height() {
        for x in 0..out.width() {
            let px = out.pixel(x, y);
            if x < 20 {
                assert_eq!(px, [17, 34, 51, 0]);
            } else {
                assert_eq!(px, [255, 0, 0, 255]);
            }
        }
    }
}
