#![allow(dead_code)]

mod display;
mod driver;
mod effects;
mod error;
mod fixed;
mod math3d;
mod raster;
mod scheduler;
mod texture;
mod util;

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context as _;
use clap::Parser;
use sdl2::keyboard::Keycode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use display::{Display, InputEvent, PixelBuffer, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use driver::Demo;
use error::{DemoError, DemoResult};
use texture::{Texture, TEX_SIZE};
use util::{frame_delay, FpsCounter, FrameClock, FPS, TARGET_FRAME_MS};

#[derive(Parser, Debug)]
#[command(name = "demoreel", version, about)]
struct Cli {
    /// Image mapped onto the pyramid (any size; resampled to 256x256).
    #[arg(long, default_value = "texture.png")]
    texture: PathBuf,

    /// Use a generated XOR texture instead of loading one.
    #[arg(long)]
    xor_texture: bool,

    /// Seed for the random source.
    #[arg(long, default_value_t = 0x2545_F491_4F6C_DD1D)]
    seed: u64,

    /// Disable VSync.
    #[arg(long)]
    no_vsync: bool,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,

    /// Run this many 16 ms frames without a window, then exit.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Where the last headless frame is written.
    #[arg(long, default_value = "frame.png", requires = "headless")]
    out: PathBuf,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_texture(cli: &Cli) -> DemoResult<Texture> {
    if cli.xor_texture {
        return Ok(Texture::xor_pattern(TEX_SIZE));
    }
    Texture::load(&cli.texture)
}

fn save_png(buffer: &PixelBuffer, path: &Path) -> DemoResult<()> {
    image::save_buffer_with_format(
        path,
        &buffer.to_rgba(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|source| DemoError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

/// Drive the demo at a simulated fixed frame interval and keep the last frame
fn run_headless(demo: &mut Demo, frames: u32, out: &Path) -> DemoResult<()> {
    let mut buffer = PixelBuffer::new();
    for _ in 0..frames {
        demo.step(TARGET_FRAME_MS, &mut buffer);
    }
    save_png(&buffer, out)?;
    info!(
        frames,
        now_ms = demo.now_ms(),
        stage = %demo.stage(),
        out = %out.display(),
        "headless run finished"
    );
    Ok(())
}

fn run_windowed(demo: &mut Demo, vsync: bool) -> DemoResult<()> {
    let (mut display, texture_creator) =
        Display::with_options("demoreel", DEFAULT_WIDTH, DEFAULT_HEIGHT, vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, display.width(), display.height())?;
    let mut buffer = PixelBuffer::with_size(display.width(), display.height());

    let clock = FrameClock::new();
    let mut fps = FpsCounter::new(FPS as usize);
    let mut last_report = 0;
    let mut last_frame = clock.now_ms();
    info!(vsync, "window open");

    'main: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(_) => {},
            }
        }

        let frame_start = clock.now_ms();
        let elapsed = u32::try_from(frame_start - last_frame).unwrap_or(u32::MAX);
        last_frame = frame_start;
        fps.record(elapsed);

        demo.step(elapsed, &mut buffer);
        display.present(&mut target, &buffer)?;

        if frame_start - last_report >= 1000 {
            last_report = frame_start;
            let (min_fps, max_fps) = fps.min_max_fps();
            debug!(
                avg_fps = fps.avg_fps(),
                min_fps,
                max_fps,
                frame_ms = fps.avg_frame_time_ms(),
                "frame rate"
            );
        }

        let spent = u32::try_from(clock.now_ms() - frame_start).unwrap_or(u32::MAX);
        match frame_delay(spent) {
            Some(delay) => thread::sleep(delay),
            None if spent > TARGET_FRAME_MS => {
                warn!(spent_ms = spent, target_ms = TARGET_FRAME_MS, "frame overran")
            },
            None => {},
        }
    }

    info!(now_ms = demo.now_ms(), "quit");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let texture = load_texture(&cli).context("texture setup")?;
    let mut demo = Demo::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, texture, cli.seed);

    match cli.headless {
        Some(frames) => run_headless(&mut demo, frames, &cli.out)
            .with_context(|| format!("headless run of {frames} frames"))?,
        None => run_windowed(&mut demo, !cli.no_vsync).context("display loop")?,
    }
    Ok(())
}
