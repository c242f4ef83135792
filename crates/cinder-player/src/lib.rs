//! Cinder Player - standalone host for Cinder games
//!
//! Provides the `PlayerApp` application handler that paces frames, feeds
//! window events into the active room and presents each finished frame.

pub mod config;
pub mod demo;
mod player_app;
mod surface;

pub use config::{GameConfig, WindowConfig};
pub use player_app::{render_frame, run_headless, PlayerApp};
pub use surface::WindowSurface;
