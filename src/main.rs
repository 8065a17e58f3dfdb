//! Binary entrypoint for the slideshow viewer.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use humantime::format_duration;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use rust_slideshow::config::Configuration;
use rust_slideshow::render::viewer::run_slideshow;
use rust_slideshow::scan::scan_directory;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "slideshow", about = "Full-screen image slideshow with cross-fades")]
struct Cli {
    /// Directory to show (overrides photo-library-path)
    #[arg(value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the cross-fade duration (ms)
    #[arg(long, value_name = "MILLIS")]
    fade_ms: Option<u64>,

    /// Override the slideshow hold duration (ms)
    #[arg(long, value_name = "MILLIS")]
    hold_ms: Option<u64>,

    /// Start with slideshow auto-advance enabled
    #[arg(long)]
    slideshow: bool,

    /// Open a normal window instead of fullscreen
    #[arg(long)]
    windowed: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(
            format!("rust_slideshow={level}")
                .parse()
                .context("invalid log directive")?,
        )
        .add_directive("wgpu=warn".parse().context("invalid log directive")?)
        .add_directive("winit=warn".parse().context("invalid log directive")?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(dir) = &cli.directory {
        cfg.photo_library_path.clone_from(dir);
    }
    if let Some(ms) = cli.fade_ms {
        cfg.fade_duration = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.hold_ms {
        cfg.hold_duration = Duration::from_millis(ms);
    }
    if cli.slideshow {
        cfg.slideshow = true;
    }
    if cli.windowed {
        cfg.fullscreen = false;
    }
    cfg.validated().context("validating configuration")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = load_config(&cli)?;
    info!(
        fade = %format_duration(cfg.fade_duration),
        hold = %format_duration(cfg.hold_duration),
        slideshow = cfg.slideshow,
        "configuration loaded"
    );
    let dir = cfg.photo_library_path.clone();
    let images = scan_directory(&dir, &cfg.scan_options())
        .with_context(|| format!("scanning {}", dir.display()))?;
    info!(count = images.len(), dir = %dir.display(), "scanned images");

    run_slideshow(cfg, dir, images)
}
