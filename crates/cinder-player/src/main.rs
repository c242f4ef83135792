//! Cinder Player - Standalone game player binary
//!
//! Runs the bundled demo game in a window, or headless for a fixed number
//! of frames.
//!
//! Usage:
//!   cinder-player [--config <game.toml>] [--room <index>] [--headless <frames>]

use anyhow::{Context, Result};
use cinder_player::demo::demo_content;
use cinder_player::{run_headless, GameConfig, PlayerApp};
use clap::Parser;
use log::info;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "cinder-player")]
#[command(about = "Cinder game player - run rooms with timers, input and collisions")]
struct Args {
    /// Path to game config file
    #[arg(long, default_value = "game.toml")]
    config: String,

    /// Start in this room instead of the configured one
    #[arg(long)]
    room: Option<usize>,

    /// Run this many frames without opening a window
    #[arg(long)]
    headless: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = GameConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config))?;
    if let Some(room) = args.room {
        config.start_room = room;
    }

    let content = demo_content();
    info!(
        "Loaded {} objects, {} rooms",
        content.object_count(),
        content.room_count()
    );

    let mut app = PlayerApp::new(content, config).context("Failed to start game")?;

    if let Some(frames) = args.headless {
        let background = app.config.background_color;
        let ran = run_headless(&mut app.env, &mut cinder_runtime::NoEvents, frames, background)
            .context("Headless run failed")?;
        info!(
            "Ran {} frames, {} instances alive",
            ran,
            app.env.instance_count()
        );
        return Ok(());
    }

    println!("Controls:");
    println!("  Arrows   - Move");
    println!("  R        - Reset score");
    println!("  Close    - Exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.take_startup_error() {
        return Err(e);
    }
    Ok(())
}
