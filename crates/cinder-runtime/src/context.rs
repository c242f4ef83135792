//! Per-hook access to the rest of the running room

use crate::input::InputState;
use crate::object::ObjectInstance;
use crate::room::Room;
use cinder_core::InstanceId;

/// Handed to every hook call.
///
/// Hooks only ever hold their own instance mutably. Anything that touches
/// the collection goes through here: deletions of other instances become a
/// flag as soon as the hook returns, and spawned instances wait for the
/// end-of-frame sweep.
pub struct FrameContext<'a> {
    input: &'a InputState,
    room: Option<&'a Room>,
    spawn_queue: &'a mut Vec<ObjectInstance>,
    destroyed: Vec<InstanceId>,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        input: &'a InputState,
        room: Option<&'a Room>,
        spawn_queue: &'a mut Vec<ObjectInstance>,
    ) -> Self {
        Self {
            input,
            room,
            spawn_queue,
            destroyed: Vec::new(),
        }
    }

    /// Keyboard and mouse state for this frame
    pub fn input(&self) -> &InputState {
        self.input
    }

    /// The room currently active, if any
    pub fn room(&self) -> Option<&Room> {
        self.room
    }

    /// Mark another instance for deletion. It keeps receiving hooks until the
    /// end of the current frame.
    pub fn destroy(&mut self, id: InstanceId) {
        self.destroyed.push(id);
    }

    /// Queue a new instance. It joins the room at the end-of-frame sweep.
    pub fn spawn(&mut self, instance: ObjectInstance) -> InstanceId {
        let id = instance.id();
        self.spawn_queue.push(instance);
        id
    }

    /// Number of instances queued so far this frame
    pub fn pending_spawns(&self) -> usize {
        self.spawn_queue.len()
    }

    pub(crate) fn into_destroyed(self) -> Vec<InstanceId> {
        self.destroyed
    }
}
