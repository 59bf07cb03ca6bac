mod common;

use common::synthetic_image::noise;
use pixelgrid::resample::BULK_THRESHOLD;
use pixelgrid::{derive_grid, resample, resample_with, CalibrationPoint, ColorMode, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn direct_and_gather_match_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..40 {
        let mode = if round % 2 == 0 { ColorMode::Rgb } else { ColorMode::Rgba };
        let width = rng.gen_range(8..160);
        let height = rng.gen_range(8..160);
        let image = noise(width, height, mode, round);

        let first = CalibrationPoint::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let second = CalibrationPoint::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let Ok(grid) = derive_grid(first, second) else {
            continue;
        };
        let direct = resample_with(&image, &grid, Strategy::Direct);
        let gather = resample_with(&image, &grid, Strategy::Gather);
        match (direct, gather) {
            (Ok(a), Ok(b)) => assert_eq!(a, b, "round {round}: {grid:?}"),
            (Err(_), Err(_)) => {}
            (a, b) => panic!("strategies disagree on success: {a:?} vs {b:?}"),
        }
    }
}

#[test]
fn threshold_straddling_grids_match() {
    // Cell counts just below, at, and above the switch point.
    let mut rng = StdRng::seed_from_u64(7);
    for (cols, rows) in [(100, 99), (100, 100), (101, 100), (125, 81), (80, 125)] {
        let cell = rng.gen_range(2..4u32);
        let offset = rng.gen_range(0..cell);
        let width = offset + cols * cell + rng.gen_range(0..cell);
        let height = offset + rows * cell + rng.gen_range(0..cell);
        let image = noise(width, height, ColorMode::Rgba, (cols * rows) as u64);

        let grid = derive_grid(
            CalibrationPoint::new(offset, offset),
            CalibrationPoint::new(offset + cell, offset),
        )
        .unwrap();
        assert_eq!(grid.cells_in(width, height), (cols, rows));

        let cells = (cols * rows) as usize;
        let expected = if cells > BULK_THRESHOLD { Strategy::Gather } else { Strategy::Direct };
        assert_eq!(Strategy::for_cells(cells), expected);

        let auto = resample(&image, &grid).unwrap();
        let direct = resample_with(&image, &grid, Strategy::Direct).unwrap();
        let gather = resample_with(&image, &grid, Strategy::Gather).unwrap();
        assert_eq!(auto, direct);
        assert_eq!(direct, gather);
    }
}
