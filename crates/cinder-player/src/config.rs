//! Game configuration loaded by the host before the first frame

use cinder_core::{CinderError, Color, Result, Vector2};
use cinder_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window settings for the platform presentation boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub caption: String,
    /// Initial top-left position; `None` lets the platform choose
    pub position: Option<Vector2>,
    pub size: Vector2,
    pub resizable: bool,
    pub borderless: bool,
    pub fullscreen: bool,
    pub show_cursor: bool,
    /// Hint for renderers that sync presentation to the display. Frame
    /// pacing always follows the active room's speed.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            caption: "Cinder".to_string(),
            position: None,
            size: Vector2::new(640, 480),
            resizable: false,
            borderless: false,
            fullscreen: false,
            show_cursor: true,
            vsync: true,
        }
    }
}

/// Everything the host needs to start a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    /// Frame clear color used while no room draws its own background
    pub background_color: Color,
    /// Index into the room table activated at startup
    pub start_room: usize,
    pub runtime: RuntimeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            background_color: Color::BLACK,
            start_room: 0,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.window.size.x <= 0 || self.window.size.y <= 0 {
            return Err(CinderError::ConfigError(format!(
                "window size must be positive, got {}x{}",
                self.window.size.x, self.window.size.y
            )));
        }
        Ok(())
    }
}
