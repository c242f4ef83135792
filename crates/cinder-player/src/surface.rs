//! Window-backed presentation surface

use cinder_core::{Color, Vector2};
use cinder_runtime::Surface;
use std::sync::Arc;
use winit::window::Window;

/// Collects a frame's draw calls and hands the finished frame to the window.
///
/// Rasterizing keyframes belongs to the platform renderer; this surface
/// records what each frame asked for so the host can report it.
pub struct WindowSurface {
    window: Arc<Window>,
    clear_color: Color,
    draws: Vec<(usize, Vector2)>,
    frames_presented: u64,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>, clear_color: Color) -> Self {
        Self {
            window,
            clear_color,
            draws: Vec::new(),
            frames_presented: 0,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Keyframe draws issued since the last clear
    pub fn draws(&self) -> &[(usize, Vector2)] {
        &self.draws
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for WindowSurface {
    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.draws.clear();
    }

    fn draw_keyframe(&mut self, keyframe: usize, top_left: Vector2) {
        self.draws.push((keyframe, top_left));
    }

    fn present(&mut self) {
        self.window.pre_present_notify();
        self.frames_presented += 1;
        log::trace!(
            "frame {} presented: {} draws over {:?}",
            self.frames_presented,
            self.draws.len(),
            self.clear_color
        );
    }
}
