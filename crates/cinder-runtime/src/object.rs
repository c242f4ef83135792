//! Object definitions, their behavior hooks, and live instances

use crate::config::ZeroDurationPolicy;
use crate::context::FrameContext;
use crate::sprite::{Sprite, SpriteInstance};
use crate::surface::Surface;
use crate::timer::Timer;
use cinder_core::{InstanceId, Rect, Result, Vector2};
use std::fmt;
use std::sync::Arc;
use winit::keyboard::KeyCode;

/// Number of timer slots every instance carries
pub const TIMER_SLOTS: usize = 12;

/// Upper bound of the conventional health range
pub const MAX_HEALTH: i32 = 100;

/// Behavior shared by every instance of one object definition.
///
/// Every hook defaults to doing nothing, so content implements only the
/// events it reacts to. Returning an error aborts the rest of the frame.
#[allow(unused_variables)]
pub trait ObjectBehavior {
    /// The instance just joined the room
    fn on_create(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    /// The instance is about to be removed by the end-of-frame sweep
    fn on_destroy(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    fn on_begin_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    /// Timer `slot` expired this frame
    fn on_alarm(&self, instance: &mut ObjectInstance, slot: usize, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    fn on_key_press(&self, instance: &mut ObjectInstance, key: KeyCode, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    fn on_key_release(&self, instance: &mut ObjectInstance, key: KeyCode, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    fn on_mouse_press(&self, instance: &mut ObjectInstance, button: u32, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    fn on_mouse_release(&self, instance: &mut ObjectInstance, button: u32, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    fn on_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    /// `instance` overlaps `other` this frame. Called once per ordered pair.
    fn on_collision(
        &self,
        instance: &mut ObjectInstance,
        other: &ObjectInstance,
        ctx: &mut FrameContext,
    ) -> Result<()> {
        Ok(())
    }

    fn on_end_step(&self, instance: &mut ObjectInstance, ctx: &mut FrameContext) -> Result<()> {
        Ok(())
    }

    /// Only called for visible instances. The default draws the sprite.
    fn on_draw(&self, instance: &ObjectInstance, surface: &mut dyn Surface) -> Result<()> {
        instance.draw_self(surface);
        Ok(())
    }
}

/// Behavior with every hook left at its default
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBehavior;

impl ObjectBehavior for NoBehavior {}

/// An immutable object type: a name, a default sprite, and its hooks.
///
/// Definitions are compared by identity (`Arc::ptr_eq`), never by value.
pub struct ObjectDefinition {
    name: String,
    default_sprite: Option<Arc<Sprite>>,
    behavior: Box<dyn ObjectBehavior>,
}

impl ObjectDefinition {
    pub fn new(name: impl Into<String>, behavior: impl ObjectBehavior + 'static) -> Self {
        Self {
            name: name.into(),
            default_sprite: None,
            behavior: Box::new(behavior),
        }
    }

    pub fn with_sprite(mut self, sprite: Arc<Sprite>) -> Self {
        self.default_sprite = Some(sprite);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_sprite(&self) -> Option<&Arc<Sprite>> {
        self.default_sprite.as_ref()
    }

    pub fn behavior(&self) -> &dyn ObjectBehavior {
        self.behavior.as_ref()
    }

    /// Build a fresh instance bound to this definition. The instance does not
    /// join any room until it is spawned.
    pub fn build_instance(self: &Arc<Self>) -> ObjectInstance {
        ObjectInstance::new(Arc::clone(self))
    }
}

impl fmt::Debug for ObjectDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDefinition")
            .field("name", &self.name)
            .field("default_sprite", &self.default_sprite.as_ref().map(|s| s.name.as_str()))
            .finish_non_exhaustive()
    }
}

/// One live entity in a room
#[derive(Debug)]
pub struct ObjectInstance {
    id: InstanceId,
    definition: Arc<ObjectDefinition>,

    pub position: Vector2,
    /// Current score
    pub score: i32,
    /// Current number of lives
    pub lives: i32,
    /// Current health, conventionally 0..=100
    pub health: i32,
    pub visible: bool,

    timers: [Timer; TIMER_SLOTS],
    sprite: Option<SpriteInstance>,
    pending_deletion: bool,
    destroy_dispatched: bool,
}

impl ObjectInstance {
    fn new(definition: Arc<ObjectDefinition>) -> Self {
        let sprite = definition.default_sprite().map(|s| s.build_instance());
        Self {
            id: InstanceId::new(),
            definition,
            position: Vector2::ZERO,
            score: 0,
            lives: 0,
            health: MAX_HEALTH,
            visible: true,
            timers: [Timer::new(); TIMER_SLOTS],
            sprite,
            pending_deletion: false,
            destroy_dispatched: false,
        }
    }

    pub fn at(mut self, position: Vector2) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn definition(&self) -> &Arc<ObjectDefinition> {
        &self.definition
    }

    /// True when this instance was built from `definition`
    pub fn is_instance_of(&self, definition: &Arc<ObjectDefinition>) -> bool {
        Arc::ptr_eq(&self.definition, definition)
    }

    pub fn timers(&self) -> &[Timer; TIMER_SLOTS] {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut [Timer; TIMER_SLOTS] {
        &mut self.timers
    }

    /// # Panics
    ///
    /// Panics if `slot >= TIMER_SLOTS`.
    pub fn timer(&self, slot: usize) -> &Timer {
        &self.timers[slot]
    }

    /// # Panics
    ///
    /// Panics if `slot >= TIMER_SLOTS`.
    pub fn timer_mut(&mut self, slot: usize) -> &mut Timer {
        &mut self.timers[slot]
    }

    pub fn sprite(&self) -> Option<&SpriteInstance> {
        self.sprite.as_ref()
    }

    /// Collision region, if the instance has a sprite
    pub fn bounding_box(&self) -> Option<Rect> {
        self.sprite
            .as_ref()
            .map(|s| s.sprite().bounding_box(self.position))
    }

    /// Request removal at the end of the current frame
    pub fn mark_for_deletion(&mut self) {
        self.pending_deletion = true;
    }

    pub fn is_pending_deletion(&self) -> bool {
        self.pending_deletion
    }

    /// Draw the current sprite keyframe at the instance position
    pub fn draw_self(&self, surface: &mut dyn Surface) {
        if let Some(sprite) = &self.sprite {
            sprite.render(surface, self.position);
        }
    }

    pub(crate) fn advance_animation(&mut self) {
        if let Some(sprite) = &mut self.sprite {
            sprite.advance();
        }
    }

    pub(crate) fn apply_timer_policy(&mut self, policy: ZeroDurationPolicy) {
        for timer in &mut self.timers {
            timer.set_policy(policy);
        }
    }

    pub(crate) fn clamp_health(&mut self) {
        self.health = self.health.clamp(0, MAX_HEALTH);
    }

    /// Flags the instance for its `on_destroy` call; false if it already had one
    pub(crate) fn take_destroy_dispatch(&mut self) -> bool {
        !std::mem::replace(&mut self.destroy_dispatched, true)
    }
}
