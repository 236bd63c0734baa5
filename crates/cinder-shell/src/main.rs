//! Cinder Shell - standalone application shell binary
//!
//! Opens the window, starts the joystick poller, and runs the event loop
//! with no engine or simulation stages attached.
//!
//! Usage:
//!   cinder-shell [--width N] [--height N] [--fullscreen] [--debug]

use anyhow::{bail, Context, Result};
use cinder_core::IntSize;
use cinder_runtime::Settings;
use cinder_shell::{ShellApp, ShellOptions};
use clap::Parser;
use std::time::Duration;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "cinder-shell")]
#[command(about = "Cinder application shell - window, input, and timing host")]
struct Args {
    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,

    /// Joystick polling interval in milliseconds
    #[arg(long, default_value_t = 40)]
    joystick_interval_ms: u64,

    /// Enable verbose debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    // Persisted settings, overridden by command-line arguments
    let mut settings = match Settings::default_path() {
        Some(path) if path.exists() => {
            Settings::load(&path).with_context(|| format!("failed to load {}", path.display()))?
        }
        _ => Settings::default(),
    };
    if let (Some(width), Some(height)) = (args.width, args.height) {
        settings.video.size = IntSize::new(width, height);
    }
    if args.fullscreen {
        settings.video.fullscreen = true;
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut shell = ShellApp::new(ShellOptions {
        video: settings.video,
        bindings: settings.bindings,
        joystick_interval: Duration::from_millis(args.joystick_interval_ms),
        debug: args.debug,
    });
    event_loop.run_app(&mut shell)?;

    if shell.exit_code() != 0 {
        bail!(
            "exited with code {}: {}",
            shell.exit_code(),
            shell.error_message()
        );
    }
    Ok(())
}
