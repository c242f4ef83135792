//! Sprite resources and per-instance animation cursors

use crate::surface::Surface;
use cinder_core::{Rect, Vector2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One image in the shared keyframe table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFrame {
    pub path: String,
}

/// Shared, immutable sprite resource: a run of keyframes plus placement data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    /// Offset from the instance position to the image's top-left corner
    pub origin: Vector2,
    /// Bounding size used for collision checks
    pub size: Vector2,
    pub preload: bool,
    pub smooth_edges: bool,
    pub transparent: bool,
    /// First index into the keyframe table
    pub first_keyframe: usize,
    pub keyframe_count: usize,
}

impl Sprite {
    pub fn new(name: impl Into<String>, size: Vector2, first_keyframe: usize, keyframe_count: usize) -> Self {
        Self {
            name: name.into(),
            origin: Vector2::ZERO,
            size,
            preload: true,
            smooth_edges: false,
            transparent: true,
            first_keyframe,
            keyframe_count,
        }
    }

    pub fn with_origin(mut self, origin: Vector2) -> Self {
        self.origin = origin;
        self
    }

    pub fn keyframe_count(&self) -> usize {
        self.keyframe_count
    }

    /// Collision region for an instance drawn at `position`
    pub fn bounding_box(&self, position: Vector2) -> Rect {
        Rect::from_origin_size(position - self.origin, self.size)
    }

    /// Bind a fresh animation cursor to this sprite
    pub fn build_instance(self: &Arc<Self>) -> SpriteInstance {
        SpriteInstance::new(Arc::clone(self))
    }
}

/// An instance's own animation cursor over a shared sprite
#[derive(Debug, Clone)]
pub struct SpriteInstance {
    sprite: Arc<Sprite>,
    current_keyframe: usize,
}

impl SpriteInstance {
    pub fn new(sprite: Arc<Sprite>) -> Self {
        Self {
            sprite,
            current_keyframe: 0,
        }
    }

    pub fn sprite(&self) -> &Arc<Sprite> {
        &self.sprite
    }

    /// Frame within this sprite's run, starting at zero
    pub fn current_keyframe(&self) -> usize {
        self.current_keyframe
    }

    /// Index into the global keyframe table
    pub fn keyframe_index(&self) -> usize {
        self.sprite.first_keyframe + self.current_keyframe
    }

    /// Step to the next keyframe, wrapping at the end of the run
    pub fn advance(&mut self) {
        if self.sprite.keyframe_count == 0 {
            return;
        }
        self.current_keyframe = (self.current_keyframe + 1) % self.sprite.keyframe_count;
    }

    pub fn render(&self, surface: &mut dyn Surface, position: Vector2) {
        if self.sprite.keyframe_count == 0 {
            return;
        }
        surface.draw_keyframe(self.keyframe_index(), position - self.sprite.origin);
    }
}
