use anyhow::{Context, Result};
use clap::Parser;
use std::f64::consts::{FRAC_PI_2, PI};
use std::path::PathBuf;
use std::rc::Rc;
use vecdraw::draw::{
    BitmapStyle, Brush, BrushStyle, Color, ColorStop, Font, FontFamily, FontStyle, FontWeight,
    ImageFormat, LinearGradient, PenStyle, RadialGradient, TextMode,
};
use vecdraw::{Bitmap, Config, DrawingContext, FillRule, PathModel, Point};

#[derive(Parser, Debug)]
#[command(name = "vecdraw")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VECDRAW_GIT_HASH"), ")"))]
#[command(about = "Render the vecdraw demonstration scene to an image file")]
struct Cli {
    /// Image file to write
    #[arg(long, short = 'o', value_name = "FILE")]
    output: PathBuf,

    /// Image format (png or jpeg); guessed from the file extension when omitted
    #[arg(long, short = 'f', value_name = "FORMAT")]
    format: Option<ImageFormat>,

    /// Surface width in pixels, overriding the config
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Surface height in pixels, overriding the config
    #[arg(long, value_name = "PX")]
    height: Option<u32>,

    /// Config file to use instead of ~/.config/vecdraw/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(width) = cli.width {
        config.surface.width = width;
    }
    if let Some(height) = cli.height {
        config.surface.height = height;
    }
    config.validate_and_clamp();

    let format = match cli.format {
        Some(format) => format,
        None => ImageFormat::from_path(&cli.output).with_context(|| {
            format!(
                "Cannot tell the image format of {}; pass --format",
                cli.output.display()
            )
        })?,
    };

    let mut dc = DrawingContext::from_config(&config).context("Failed to create drawing context")?;
    draw_demo(&mut dc).context("Failed to draw the demonstration scene")?;

    let bitmap = dc.snapshot()?;
    bitmap
        .save_file(&cli.output, format, cli.quality)
        .with_context(|| format!("Failed to save {}", cli.output.display()))?;

    println!(
        "Wrote {}x{} {} image to {}",
        bitmap.width(),
        bitmap.height(),
        format,
        cli.output.display()
    );
    Ok(())
}

/// Draws a scene that touches paths, regions, every brush source and text.
fn draw_demo(dc: &mut DrawingContext) -> Result<()> {
    let (width, height) = dc.size();
    let (w, h) = (f64::from(width), f64::from(height));
    // Scene is laid out on a 500x500 grid.
    dc.clear()?;
    dc.set_scale(w / 500.0, h / 500.0);

    // Gradient panel
    let gradient = LinearGradient::new(
        20.0,
        20.0,
        230.0,
        20.0,
        vec![
            ColorStop::new(0.0, Color::from_rgb8(30, 90, 200)),
            ColorStop::new(1.0, Color::from_rgb8(120, 200, 255)),
        ],
    );
    dc.set_brush(Rc::new(Brush::new(Color::from_rgb8(0, 0, 0), BrushStyle::Solid).with_gradient(gradient)));
    let pen = dc.pen_list().find_or_create(Color::from_rgb8(20, 40, 80), 2.0, PenStyle::Solid, None, None);
    dc.set_pen(pen);
    dc.draw_rounded_rectangle(20.0, 20.0, 210.0, 130.0, 16.0)?;

    // Hatched ellipse clipped to a ring
    let mut clip = dc.create_region()?;
    clip.set_ellipse(270.0, 20.0, 210.0, 210.0)?;
    let mut hole = dc.create_region()?;
    hole.set_ellipse(330.0, 80.0, 90.0, 90.0)?;
    clip.subtract(&hole)?;
    dc.set_clipping_region(Some(clip));
    let hatch = dc
        .brush_list()
        .find_or_create(Color::from_rgb8(200, 60, 40), BrushStyle::CrossHatch);
    dc.set_brush(hatch);
    let pen = dc.pen_list().find_or_create(Color::from_rgb8(120, 30, 20), 3.0, PenStyle::Solid, None, None);
    dc.set_pen(pen);
    dc.draw_ellipse(270.0, 20.0, 210.0, 210.0)?;
    dc.set_clipping_region(None);

    // Radial pie wedge
    let radial = RadialGradient::new(
        125.0,
        300.0,
        5.0,
        125.0,
        300.0,
        100.0,
        vec![
            ColorStop::new(0.0, Color::from_rgb8(255, 230, 120)),
            ColorStop::new(1.0, Color::from_rgb8(220, 120, 0)),
        ],
    );
    dc.set_brush(Rc::new(Brush::default().with_gradient(radial)));
    let pen = dc.pen_list().find_or_create(Color::from_rgb8(90, 50, 0), 1.0, PenStyle::Solid, None, None);
    dc.set_pen(pen);
    dc.draw_arc(25.0, 200.0, 200.0, 200.0, FRAC_PI_2, 2.0 * PI)?;

    // Star path with the odd-even rule
    let mut star = PathModel::new();
    let points: Vec<Point> = (0..5)
        .map(|i| {
            let angle = -FRAC_PI_2 + f64::from(i * 4) * PI / 5.0;
            Point::new(80.0 * angle.cos(), 80.0 * angle.sin())
        })
        .collect();
    star.move_to(points[0].x, points[0].y);
    star.lines(&points[1..], 0.0, 0.0)?;
    star.close()?;
    let stars = dc
        .brush_list()
        .find_or_create(Color::from_rgb8(80, 160, 80), BrushStyle::Solid);
    dc.set_brush(stars);
    let dashed = dc.pen_list().find_or_create(Color::from_rgb8(20, 80, 20), 2.0, PenStyle::ShortDash, None, None);
    dc.set_pen(dashed);
    dc.draw_path(&star, 375.0, 330.0, FillRule::OddEven)?;

    // Spline and a checkered bitmap
    let pen = dc.pen_list().find_or_create(Color::from_rgb8(0, 0, 0), 1.5, PenStyle::Solid, None, None);
    dc.set_pen(pen);
    dc.draw_spline(20.0, 470.0, 250.0, 380.0, 480.0, 470.0)?;
    dc.draw_bitmap(&checkerboard(24, 4), 238.0, 250.0, BitmapStyle::Solid, None, None)?;

    // Rotated and boxed text
    dc.set_font(Rc::new(
        Font::new(22.0, FontFamily::Roman, FontStyle::Italic, FontWeight::Bold).with_underline(true),
    ));
    dc.set_text_mode(TextMode::Solid);
    dc.set_text_background(Color::from_rgb8(255, 255, 200));
    dc.draw_text("vecdraw", 30.0, 165.0, false, 0, 0.0)?;
    dc.set_text_mode(TextMode::Transparent);
    dc.draw_text("\u{FB01}ne lines", 260.0, 480.0, false, 0, PI / 8.0)?;

    Ok(())
}

fn checkerboard(size: u32, cell: u32) -> Bitmap {
    let mut bitmap = Bitmap::new(size, size, false, false);
    let mut argb = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 };
            argb.extend_from_slice(&[255, v, v, v]);
        }
    }
    bitmap.set_argb_pixels(0, 0, size, size, &argb, false, false);
    bitmap
}
