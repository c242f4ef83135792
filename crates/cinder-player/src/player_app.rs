//! Player application implementing winit ApplicationHandler
//!
//! Owns the running state and frame pacing: each due frame clears to the
//! game background, runs the room's `update()` then `draw()`, and the surface
//! presents once the frame is done.

use crate::config::GameConfig;
use crate::surface::WindowSurface;
use anyhow::Result;
use cinder_core::{CinderError, Color};
use cinder_runtime::{
    EventBus, EventSource, FrameOutcome, GameClock, GameContent, PlatformEvent, RoomEnvironment,
    Surface,
};
use log::{debug, error, info};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

pub struct PlayerApp {
    pub env: RoomEnvironment,
    pub content: GameContent,
    pub config: GameConfig,

    clock: GameClock,
    events: EventBus,
    surface: Option<WindowSurface>,
    running: bool,
    startup_error: Option<anyhow::Error>,
}

impl PlayerApp {
    /// Build the environment and activate the configured start room
    pub fn new(content: GameContent, config: GameConfig) -> Result<Self> {
        let mut env = RoomEnvironment::with_config(config.runtime);
        let room = Arc::clone(content.room(config.start_room)?);
        let speed = room.speed;
        env.activate(Some(room))?;

        Ok(Self {
            clock: GameClock::with_speed(speed),
            env,
            content,
            config,
            events: EventBus::new(),
            surface: None,
            running: true,
            startup_error: None,
        })
    }

    /// Startup failure recorded while the event loop was running
    pub fn take_startup_error(&mut self) -> Option<anyhow::Error> {
        self.startup_error.take()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn window_attributes(&self) -> WindowAttributes {
        let window = &self.config.window;
        let mut attrs = Window::default_attributes()
            .with_title(window.caption.clone())
            .with_inner_size(PhysicalSize::new(window.size.x as u32, window.size.y as u32))
            .with_resizable(window.resizable)
            .with_decorations(!window.borderless);
        if let Some(position) = window.position {
            attrs = attrs.with_position(PhysicalPosition::new(position.x, position.y));
        }
        if window.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        attrs
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(self.window_attributes())
            .map_err(|e| CinderError::PlatformError(format!("failed to create window: {e}")))?;
        let window = Arc::new(window);
        window.set_cursor_visible(self.config.window.show_cursor);
        if self.config.window.vsync {
            info!("vsync requested; pacing follows the room speed");
        }

        self.surface = Some(WindowSurface::new(window, self.config.background_color));
        Ok(())
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        self.clock.tick();
        self.advance_due_frame();

        if !self.running {
            event_loop.exit();
        }
    }

    /// Run at most one frame, drawn and presented right after its update.
    /// Time banked beyond that frame is dropped rather than simulated
    /// without a draw.
    fn advance_due_frame(&mut self) -> bool {
        if !self.running || !self.clock.should_step() {
            return false;
        }

        self.clock.consume_step();
        let skipped = self.clock.drop_backlog();
        if skipped > 0 {
            debug!("host fell behind, skipped {} frames", skipped);
        }

        self.run_frame();
        if self.running {
            self.present();
        }
        true
    }

    fn run_frame(&mut self) {
        if self.env.active_room().is_none() {
            // Nothing consumes events without a room; still honor quit
            if self.events.drain().contains(&PlatformEvent::Quit) {
                self.running = false;
            }
            return;
        }

        match self.env.update(&mut self.events) {
            Ok(FrameOutcome::Continue) => {}
            Ok(FrameOutcome::Quit) => self.running = false,
            Err(e) => error!("frame {} aborted: {}", self.env.frame(), e),
        }
    }

    fn present(&mut self) {
        let Some(surface) = &mut self.surface else {
            return;
        };

        if let Err(e) = render_frame(&self.env, surface, self.config.background_color) {
            error!("draw failed: {}", e);
        }
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            self.startup_error = Some(e);
            self.running = false;
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::RedrawRequested = event {
            self.tick(event_loop);
        } else if let Some(event) = PlatformEvent::from_window_event(&event) {
            self.events.push(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.running {
            event_loop.exit();
            return;
        }

        if let Some(surface) = &self.surface {
            surface.window().request_redraw();
        }
        match self.clock.next_frame_at() {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Poll),
        }
    }
}

/// Clear to the game background, draw the room, then present. The surface
/// is presented even when a draw hook fails.
pub fn render_frame(
    env: &RoomEnvironment,
    surface: &mut dyn Surface,
    background: Color,
) -> cinder_core::Result<()> {
    surface.clear(background);
    let drawn = env.draw(surface);
    surface.present();
    drawn
}

/// Drive `frames` frames without a window, returning how many ran before
/// a quit. Used for smoke tests and CI.
pub fn run_headless(
    env: &mut RoomEnvironment,
    events: &mut dyn EventSource,
    frames: u64,
    background: Color,
) -> cinder_core::Result<u64> {
    let mut surface = cinder_runtime::NullSurface;
    for frame in 0..frames {
        let outcome = env.update(events)?;
        render_frame(env, &mut surface, background)?;
        if outcome == FrameOutcome::Quit {
            return Ok(frame + 1);
        }
    }
    Ok(frames)
}
