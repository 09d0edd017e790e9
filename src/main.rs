use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use povsim::{check_angle_step, LedLayout, Presenter, PresenterConfig, SamplingConfig, SourceImage};

#[derive(Parser, Debug)]
#[command(name = "povsim")]
#[command(version, about = "Simulate a persistence-of-vision LED display", long_about = None)]
struct Args {
    /// Image to which the POV is applied
    #[arg(short, long, value_name = "FILE", default_value = "images/bird.png")]
    image: PathBuf,

    /// Alpha of the background image [0, 255]
    #[arg(short, long, default_value_t = 10)]
    alpha: u8,

    /// Width of the (square) background frame, in pixels
    #[arg(short = 'w', long, default_value_t = 600)]
    frame_width: u32,

    /// Number of LEDs
    #[arg(short = 'n', long, default_value_t = 15)]
    leds: usize,

    /// LED radius
    #[arg(long, default_value_t = 8.0)]
    led_radius: f64,

    /// Distance between the borders of two LEDs
    #[arg(long, default_value_t = 1.0)]
    led_separation: f64,

    /// Offset of the first LED with respect to the center
    #[arg(long, default_value_t = 15.0)]
    led_center_offset: f64,

    /// Angular span used when computing the average color (degrees)
    #[arg(long, default_value_t = 1.0)]
    angle_avg_span: f64,

    /// Number of sample points across the angular span
    #[arg(long, default_value_t = 3)]
    angle_avg_points: usize,

    /// Radial span used when computing the average color (pixels)
    #[arg(long, default_value_t = 10.0)]
    radial_avg_span: f64,

    /// Number of sample points across the radial span
    #[arg(long, default_value_t = 3)]
    radial_avg_points: usize,

    /// Angular resolution of the sweep (degrees)
    #[arg(long, default_value_t = 1.0)]
    angle_step: f64,

    /// TrueType/OpenType font for the on-screen status line
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Frame rate cap
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Write the LED color table as CSV and exit without opening a window
    #[arg(long, value_name = "FILE")]
    dump: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let angle_step = check_angle_step(args.angle_step)?;
    let sampling = SamplingConfig::new(
        args.angle_avg_span,
        args.angle_avg_points,
        args.radial_avg_span,
        args.radial_avg_points,
    )?;
    let layout = LedLayout::builder()
        .led_count(args.leds)
        .led_radius(args.led_radius)
        .led_separation(args.led_separation)
        .led_center_offset(args.led_center_offset)
        .build();

    let font_data = args
        .font
        .as_ref()
        .map(|path| {
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))
        })
        .transpose()?;

    let config = PresenterConfig::builder()
        .title(format!("POV simulator - {}", args.image.display()))
        .frame_width(args.frame_width)
        .max_framerate(args.fps)
        .angle_step(angle_step)
        .image_alpha(args.alpha)
        .maybe_font_data(font_data)
        .build();

    let image = SourceImage::open(&args.image, args.frame_width)
        .with_context(|| format!("loading {}", args.image.display()))?;

    let presenter = Presenter::new(image, sampling, layout, config)?;

    if let Some(path) = args.dump {
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        presenter.table().write_csv(BufWriter::new(file))?;
        info!("wrote color table to {}", path.display());
        return Ok(());
    }

    presenter.show().context("display loop failed")?;
    Ok(())
}
