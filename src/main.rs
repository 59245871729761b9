//! roomkit - first-person interaction, placement and drag manipulation
//!
//! Headless runner: builds a demo room, drives the interaction rig from an
//! optional scripted input file and writes interaction events as JSONL.

mod config;
mod demo;
mod headless;
mod scripted_input;

use anyhow::{Context, Result};
use config::{InteractionConfig, DEFAULT_CONFIG_PATH};
use roomkit_testkit::{EventSink, JsonlSink};
use std::{env, path::PathBuf};
use tracing::{debug, info};

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.help {
        print_usage();
        return Ok(());
    }
    info!("Starting roomkit v{}", env!("CARGO_PKG_VERSION"));

    let interaction = InteractionConfig::load_from_path(&cli.config);

    let mut log = match &cli.event_log {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to open event log {}", path.display()))?,
        ),
        None => None,
    };

    let summary = headless::run(
        headless::HeadlessConfig {
            interaction,
            scripted_input: cli.scripted_input.clone(),
            max_frames: cli.frames,
            dt: 1.0 / cli.fps,
        },
        log.as_mut().map(|sink| sink as &mut dyn EventSink),
    )?;

    if let Some(sink) = log.as_mut() {
        sink.flush().context("failed to flush event log")?;
    }

    println!(
        "ran {} frames ({} physics steps), {} interaction events, {} objects in scene",
        summary.frames, summary.physics_steps, summary.events, summary.objects
    );
    debug!(hud_shapes = summary.hud_shapes, "final HUD frame");
    Ok(())
}

fn print_usage() {
    println!(
        "usage: roomkit [--config PATH] [--scripted-input PATH] [--frames N] [--fps N] \
         [--event-log PATH]"
    );
}

struct CliOptions {
    help: bool,
    config: PathBuf,
    scripted_input: Option<PathBuf>,
    frames: Option<u64>,
    fps: f32,
    event_log: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            help: false,
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            scripted_input: None,
            frames: None,
            fps: 60.0,
            event_log: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => opts.help = true,
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = PathBuf::from(path);
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--scripted-input" => {
                    if let Some(path) = args.next() {
                        opts.scripted_input = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--scripted-input requires a file path");
                    }
                }
                "--frames" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.frames = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--frames must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--frames requires an integer");
                    }
                }
                "--fps" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<f32>() {
                            Ok(value) if value >= 1.0 => opts.fps = value,
                            Ok(value) => {
                                tracing::error!(value, "--fps must be at least 1");
                            }
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--fps must be a number");
                            }
                        }
                    } else {
                        tracing::error!("--fps requires a number");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                other => {
                    tracing::warn!(arg = %other, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}
