//! The room environment: live instances and the per-frame phase sequence
//!
//! `update()` runs, in order: begin-step, timers, platform events, step,
//! collision, end-step. Every phase visits the same collection; instances
//! destroyed or spawned by hooks are applied by one sweep at the end of the
//! frame.

use crate::collision::{BoundingBoxOverlap, CollisionPredicate};
use crate::config::RuntimeConfig;
use crate::context::FrameContext;
use crate::event::{EventSource, PlatformEvent};
use crate::input::InputState;
use crate::object::{ObjectBehavior, ObjectInstance, TIMER_SLOTS};
use crate::room::Room;
use crate::surface::Surface;
use cinder_core::{InstanceId, Result};
use log::{debug, info, warn};
use std::sync::Arc;

/// What the host loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// A quit event arrived. The frame still ran to completion.
    Quit,
}

/// Owns the instances of the active room and drives their hooks
pub struct RoomEnvironment {
    active_room: Option<Arc<Room>>,
    instances: Vec<ObjectInstance>,
    spawn_queue: Vec<ObjectInstance>,
    input: InputState,
    collision: Box<dyn CollisionPredicate>,
    config: RuntimeConfig,
    frame: u64,
}

impl Default for RoomEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomEnvironment {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            active_room: None,
            instances: Vec::new(),
            spawn_queue: Vec::new(),
            input: InputState::new(),
            collision: Box::new(BoundingBoxOverlap),
            config,
            frame: 0,
        }
    }

    /// Replace the collision predicate used by the collision phase
    pub fn with_collision(mut self, predicate: impl CollisionPredicate + 'static) -> Self {
        self.collision = Box::new(predicate);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn active_room(&self) -> Option<&Arc<Room>> {
        self.active_room.as_ref()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Frames completed since the environment was created
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn instances(&self) -> &[ObjectInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instance(&self, id: InstanceId) -> Option<&ObjectInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    /// Mutable access between frames, e.g. for the host or for tests
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut ObjectInstance> {
        self.instances.iter_mut().find(|i| i.id() == id)
    }

    /// Switch rooms. All live and queued instances are dropped without
    /// `on_destroy`, then the new room's setup routine runs.
    pub fn activate(&mut self, room: Option<Arc<Room>>) -> Result<()> {
        let dropped = self.instances.len() + self.spawn_queue.len();
        self.instances.clear();
        self.spawn_queue.clear();
        self.active_room = room.clone();

        let Some(room) = room else {
            debug!("room cleared ({} instances dropped)", dropped);
            return Ok(());
        };

        info!("activating room '{}' ({} instances dropped)", room.name, dropped);
        room.setup(self)?;
        debug!("room '{}' set up with {} instances", room.name, self.instances.len());
        Ok(())
    }

    /// Add an instance to the live collection and run its `on_create`.
    ///
    /// Call between frames only; hooks spawn through [`FrameContext::spawn`].
    pub fn spawn(&mut self, instance: ObjectInstance) -> Result<InstanceId> {
        let id = instance.id();
        self.spawn_queue.push(instance);
        self.flush_spawns()?;
        Ok(id)
    }

    /// Run one simulation frame.
    ///
    /// A hook error aborts the remaining phases and is returned; deferred
    /// deletions and spawns are applied either way.
    pub fn update(&mut self, events: &mut dyn EventSource) -> Result<FrameOutcome> {
        if self.active_room.is_none() {
            return Ok(FrameOutcome::Continue);
        }

        let outcome = self.run_phases(events);
        let swept = self.sweep();
        self.frame += 1;

        let outcome = outcome?;
        swept?;
        Ok(outcome)
    }

    /// Dispatch `on_draw` for every visible instance in collection order
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<()> {
        let Some(room) = &self.active_room else {
            return Ok(());
        };

        if room.draw_background_color {
            surface.clear(room.background_color);
        }

        for instance in self.instances.iter().filter(|i| i.visible) {
            let definition = instance.definition();
            definition
                .behavior()
                .on_draw(instance, surface)
                .inspect_err(|e| warn!("{} on_draw failed: {}", definition.name(), e))?;
        }
        Ok(())
    }

    fn run_phases(&mut self, events: &mut dyn EventSource) -> Result<FrameOutcome> {
        self.for_each_instance("on_begin_step", |behavior, instance, ctx| {
            behavior.on_begin_step(instance, ctx)
        })?;

        self.timer_phase()?;

        let outcome = self.event_phase(events)?;

        self.for_each_instance("on_step", |behavior, instance, ctx| {
            behavior.on_step(instance, ctx)
        })?;

        self.collision_phase()?;

        self.for_each_instance("on_end_step", |behavior, instance, ctx| {
            behavior.on_end_step(instance, ctx)
        })?;

        for instance in &mut self.instances {
            instance.advance_animation();
        }

        Ok(outcome)
    }

    fn timer_phase(&mut self) -> Result<()> {
        self.for_each_instance("on_alarm", |behavior, instance, ctx| {
            for slot in 0..TIMER_SLOTS {
                let timer = instance.timer_mut(slot);
                timer.advance();
                if timer.is_due() {
                    behavior.on_alarm(instance, slot, ctx)?;
                }
            }
            Ok(())
        })
    }

    fn event_phase(&mut self, events: &mut dyn EventSource) -> Result<FrameOutcome> {
        self.input.end_frame();

        let mut outcome = FrameOutcome::Continue;
        while let Some(event) = events.poll_event() {
            self.input.process_event(&event);
            match event {
                PlatformEvent::Quit => {
                    info!("quit requested at frame {}", self.frame);
                    outcome = FrameOutcome::Quit;
                }
                PlatformEvent::KeyDown(key) => {
                    self.for_each_instance("on_key_press", |behavior, instance, ctx| {
                        behavior.on_key_press(instance, key, ctx)
                    })?;
                }
                PlatformEvent::KeyUp(key) => {
                    self.for_each_instance("on_key_release", |behavior, instance, ctx| {
                        behavior.on_key_release(instance, key, ctx)
                    })?;
                }
                PlatformEvent::MouseButtonDown(button) => {
                    self.for_each_instance("on_mouse_press", |behavior, instance, ctx| {
                        behavior.on_mouse_press(instance, button, ctx)
                    })?;
                }
                PlatformEvent::MouseButtonUp(button) => {
                    self.for_each_instance("on_mouse_release", |behavior, instance, ctx| {
                        behavior.on_mouse_release(instance, button, ctx)
                    })?;
                }
                PlatformEvent::MouseMoved { .. } => {}
            }
        }
        Ok(outcome)
    }

    fn collision_phase(&mut self) -> Result<()> {
        let Self {
            active_room,
            instances,
            spawn_queue,
            input,
            collision,
            config,
            ..
        } = self;
        let room = active_room.as_deref();
        let count = instances.len();

        for a in 0..count {
            for b in 0..count {
                if a == b {
                    continue;
                }
                let (instance, other) = pair_mut(instances, a, b);
                if !collision.overlaps(instance, other) {
                    continue;
                }

                let definition = Arc::clone(instance.definition());
                let mut ctx = FrameContext::new(input, room, spawn_queue);
                let result = definition.behavior().on_collision(instance, other, &mut ctx);
                let destroyed = ctx.into_destroyed();
                settle(instances, spawn_queue, a, destroyed, config);
                result.inspect_err(|e| warn!("{} on_collision failed: {}", definition.name(), e))?;
            }
        }
        Ok(())
    }

    /// Call `hook` once per live instance, in collection order
    fn for_each_instance<F>(&mut self, hook: &'static str, call: F) -> Result<()>
    where
        F: FnMut(&dyn ObjectBehavior, &mut ObjectInstance, &mut FrameContext) -> Result<()>,
    {
        let count = self.instances.len();
        self.dispatch(hook, 0..count, call)
    }

    fn dispatch<F>(
        &mut self,
        hook: &'static str,
        indices: impl IntoIterator<Item = usize>,
        mut call: F,
    ) -> Result<()>
    where
        F: FnMut(&dyn ObjectBehavior, &mut ObjectInstance, &mut FrameContext) -> Result<()>,
    {
        let Self {
            active_room,
            instances,
            spawn_queue,
            input,
            config,
            ..
        } = self;
        let room = active_room.as_deref();

        for index in indices {
            let definition = Arc::clone(instances[index].definition());
            let mut ctx = FrameContext::new(input, room, spawn_queue);
            let result = call(definition.behavior(), &mut instances[index], &mut ctx);
            let destroyed = ctx.into_destroyed();
            settle(instances, spawn_queue, index, destroyed, config);
            result.inspect_err(|e| warn!("{} {} failed: {}", definition.name(), hook, e))?;
        }
        Ok(())
    }

    /// Apply deferred mutations: remove deleted instances, then add queued ones
    fn sweep(&mut self) -> Result<()> {
        let destroyed = self.dispatch_destroys();

        let before = self.instances.len();
        self.instances.retain(|i| !i.is_pending_deletion());
        let removed = before - self.instances.len();

        let spawned = self.flush_spawns();
        if removed > 0 {
            debug!("sweep removed {} instances", removed);
        }
        destroyed.and(spawned)
    }

    /// `on_destroy` for every pending instance, including ones marked by
    /// other `on_destroy` calls. Each instance gets exactly one call.
    fn dispatch_destroys(&mut self) -> Result<()> {
        let mut first_error = None;
        loop {
            let batch: Vec<usize> = self
                .instances
                .iter_mut()
                .enumerate()
                .filter(|(_, i)| i.is_pending_deletion())
                .filter_map(|(index, i)| i.take_destroy_dispatch().then_some(index))
                .collect();
            if batch.is_empty() {
                break;
            }
            if let Err(e) = self.dispatch("on_destroy", batch, |behavior, instance, ctx| {
                behavior.on_destroy(instance, ctx)
            }) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Move queued instances into the collection and run their `on_create`.
    /// Instances spawned by those hooks are added in the same pass. Queued
    /// instances destroyed before joining are dropped without any hook.
    fn flush_spawns(&mut self) -> Result<()> {
        let mut first_error = None;
        while !self.spawn_queue.is_empty() {
            let start = self.instances.len();
            let policy = self.config.zero_duration;
            let queued = self.spawn_queue.len();
            self.instances.extend(
                self.spawn_queue
                    .drain(..)
                    .filter(|instance| !instance.is_pending_deletion())
                    .map(|mut instance| {
                        instance.apply_timer_policy(policy);
                        instance
                    }),
            );
            let end = self.instances.len();
            if end - start < queued {
                debug!("dropped {} instances destroyed before joining", queued - (end - start));
            }
            debug!("spawned {} instances", end - start);

            if let Err(e) = self.dispatch("on_create", start..end, |behavior, instance, ctx| {
                behavior.on_create(instance, ctx)
            }) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// After a hook returns: flag the instances it destroyed, live or still
/// queued, and apply the health policy to the instance it ran on
fn settle(
    instances: &mut [ObjectInstance],
    spawn_queue: &mut [ObjectInstance],
    index: usize,
    destroyed: Vec<InstanceId>,
    config: &RuntimeConfig,
) {
    for id in destroyed {
        match instances
            .iter_mut()
            .chain(spawn_queue.iter_mut())
            .find(|i| i.id() == id)
        {
            Some(target) => target.mark_for_deletion(),
            None => debug!("destroy of unknown instance {}", id),
        }
    }
    if config.clamp_health {
        instances[index].clamp_health();
    }
}

/// Borrow `items[a]` mutably and `items[b]` shared. `a != b`.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &left[b])
    }
}
