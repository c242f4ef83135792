//! Presentation boundary the room environment draws through

use cinder_core::{Color, Vector2};

/// The platform's frame buffer as seen by the simulation core.
///
/// The core decides when these are called; how pixels reach the screen is
/// up to the implementation.
pub trait Surface {
    /// Fill the whole frame with a color
    fn clear(&mut self, color: Color);

    /// Draw one keyframe (a global index into the keyframe table) with its
    /// top-left corner at `top_left`
    fn draw_keyframe(&mut self, keyframe: usize, top_left: Vector2);

    /// Flush the finished frame
    fn present(&mut self) {}
}

/// A surface that drops every call. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self, _color: Color) {}

    fn draw_keyframe(&mut self, _keyframe: usize, _top_left: Vector2) {}
}
