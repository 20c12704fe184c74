//! `kinema [settings.json] [--headless FRAMES]`
//!
//! Without `--headless` the demo opens a window (feature `winit`). Headless
//! mode waits for the models, simulates `FRAMES` frames at 60 Hz and logs
//! what played.

use anyhow::{Context, bail};
use kinema::{DemoApp, DemoSettings};

const FRAME_MS: f64 = 1000.0 / 60.0;

struct Args {
    settings: Option<String>,
    headless: Option<u32>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        settings: None,
        headless: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--headless" {
            let frames = iter.next().context("--headless expects a frame count")?;
            args.headless = Some(
                frames
                    .parse()
                    .with_context(|| format!("invalid frame count '{frames}'"))?,
            );
        } else if arg.starts_with("--") {
            bail!("unknown option '{arg}'");
        } else {
            args.settings = Some(arg);
        }
    }
    Ok(args)
}

fn run_headless(settings: DemoSettings, frames: u32) {
    let mut app = DemoApp::new(settings);
    app.wait_for_loads();

    let Some(driver) = app.driver() else {
        log::warn!("No animated model loaded; nothing to play");
        return;
    };
    log::info!("{} clips available", driver.clip_count());
    for (i, clip) in driver.clips().iter().enumerate() {
        log::info!("  [{i}] '{}' ({:.2}s, {} tracks)", clip.name, clip.duration, clip.tracks.len());
    }

    for frame in 0..=frames {
        app.frame(f64::from(frame) * FRAME_MS);
    }

    log::info!(
        "Simulated {frames} frames, {:.3}s of animation",
        app.clock().elapsed
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let settings = match &args.settings {
        Some(path) => DemoSettings::load(path).with_context(|| format!("reading {path}"))?,
        None => DemoSettings::default(),
    };

    if let Some(frames) = args.headless {
        run_headless(settings, frames);
        return Ok(());
    }

    run_windowed(settings)
}

#[cfg(feature = "winit")]
fn run_windowed(settings: DemoSettings) -> anyhow::Result<()> {
    kinema::app::winit::run(settings)?;
    Ok(())
}

#[cfg(not(feature = "winit"))]
fn run_windowed(_settings: DemoSettings) -> anyhow::Result<()> {
    bail!("built without the `winit` feature; run with --headless FRAMES")
}
