//! Room definitions

use crate::environment::RoomEnvironment;
use cinder_core::{Color, Result, Vector2};
use std::fmt;

/// Populates a freshly activated room environment with its initial instances
pub type RoomSetup = Box<dyn Fn(&mut RoomEnvironment) -> Result<()>>;

/// Static room configuration. Activating a room clears the environment and
/// runs the setup routine.
pub struct Room {
    pub name: String,
    /// Frames per second the host should run this room at
    pub speed: u32,
    pub persistent: bool,
    /// Clear to `background_color` before drawing instances
    pub draw_background_color: bool,
    pub enable_views: bool,
    pub size: Vector2,
    pub isometric: bool,
    pub snap: Vector2,
    pub background_color: Color,
    setup: Option<RoomSetup>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed: 30,
            persistent: false,
            draw_background_color: true,
            enable_views: false,
            size: Vector2::new(640, 480),
            isometric: false,
            snap: Vector2::new(16, 16),
            background_color: Color::rgb(192, 192, 192),
            setup: None,
        }
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_size(mut self, size: Vector2) -> Self {
        self.size = size;
        self
    }

    pub fn with_background(mut self, color: Color, draw: bool) -> Self {
        self.background_color = color;
        self.draw_background_color = draw;
        self
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut RoomEnvironment) -> Result<()> + 'static,
    {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Spawn the room's initial instances into `env`
    pub fn setup(&self, env: &mut RoomEnvironment) -> Result<()> {
        match &self.setup {
            Some(setup) => setup(env),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("name", &self.name)
            .field("speed", &self.speed)
            .field("size", &self.size)
            .field("background_color", &self.background_color)
            .field("has_setup", &self.setup.is_some())
            .finish_non_exhaustive()
    }
}
