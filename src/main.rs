//! pixelgrid CLI - Rebuild pixel art from an upscaled image given two pixel corners

use clap::Parser;
use pixelgrid::{CalibrationPoint, CanvasSize, PixelGridError, Session};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixelgrid", about = "Rebuild clean pixel art from an upscaled image")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// First corner of one pixel, as X,Y (anchors the grid phase)
    #[arg(long, value_parser = parse_pair::<i32>, allow_hyphen_values = true)]
    from: (i32, i32),
    /// Opposite corner of the same pixel, as X,Y
    #[arg(long, value_parser = parse_pair::<i32>, allow_hyphen_values = true)]
    to: (i32, i32),
    /// Output image (format from extension, PNG otherwise) [default: <input>_pixel_art.png]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write the source with the calibrated grid drawn over it
    #[arg(long)]
    overlay: Option<PathBuf>,
    /// Treat --from/--to as canvas coordinates under --canvas/--zoom/--pan
    #[arg(long)]
    screen: bool,
    /// Canvas size as WxH
    #[arg(long, default_value = "800x600", value_parser = parse_size)]
    canvas: (u32, u32),
    /// Zoom steps of 1.5x (negative zooms out)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    zoom: i32,
    /// Pan offset in canvas pixels, as DX,DY
    #[arg(long, default_value = "0,0", value_parser = parse_pair::<i32>, allow_hyphen_values = true)]
    pan: (i32, i32),
    /// Print a JSON report to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a Path,
    output: &'a Path,
    mode: pixelgrid::ColorMode,
    source: (u32, u32),
    corners: [CalibrationPoint; 2],
    grid: pixelgrid::GridSpec,
    cells: (u32, u32),
    result: (u32, u32),
}

fn parse_pair<T: std::str::FromStr>(s: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<T>().map_err(|_| format!("invalid number '{v}'"));
    Ok((parse(a)?, parse(b)?))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|_| format!("invalid size '{v}'"));
    Ok((parse(w)?, parse(h)?))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    input.with_file_name(format!("{stem}_pixel_art.png"))
}

fn image_point(session: &Session, (x, y): (i32, i32), screen: bool) -> CalibrationPoint {
    if screen {
        session
            .view()
            .to_image_coords(x as f64, y as f64, session.source().dimensions())
    } else {
        let (w, h) = session.source().dimensions();
        CalibrationPoint::new(x.clamp(0, w as i32 - 1) as u32, y.clamp(0, h as i32 - 1) as u32)
    }
}

fn main() -> Result<(), PixelGridError> {
    env_logger::init();
    let args = Args::parse();

    let mut session = Session::open(&args.input)?
        .with_canvas(CanvasSize::new(args.canvas.0, args.canvas.1));
    for _ in 0..args.zoom.max(0) {
        session.zoom_in();
    }
    for _ in 0..(-args.zoom).max(0) {
        session.zoom_out();
    }
    session.pan_by(args.pan.0, args.pan.1);

    let first = image_point(&session, args.from, args.screen);
    let second = image_point(&session, args.to, args.screen);
    let grid = session.select_points(first, second)?;

    if let Some(path) = &args.overlay {
        pixelgrid::io::save(&session.preview()?, path)?;
    }

    let result = session.process()?.dimensions();
    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input));
    session.save_result(&output)?;

    if args.json {
        let source = session.source();
        let report = Report {
            input: &args.input,
            output: &output,
            mode: source.mode(),
            source: source.dimensions(),
            corners: [first, second],
            grid,
            cells: grid.cells_in(source.width(), source.height()),
            result,
        };
        let json = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        writeln!(std::io::stdout(), "{json}")?;
    } else {
        eprintln!(
            "cell {}px offset ({}, {}) -> {}x{} written to {}",
            grid.cell_size(),
            grid.offset_x(),
            grid.offset_y(),
            result.0,
            result.1,
            output.display()
        );
    }
    Ok(())
}
