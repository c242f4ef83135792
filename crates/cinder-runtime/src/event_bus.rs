//! Event queue between the host loop and the room's event phase

use crate::event::{EventSource, PlatformEvent};
use std::collections::VecDeque;

/// A FIFO the host pushes platform events into and the event phase drains
pub struct EventBus {
    events: VecDeque<PlatformEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: PlatformEvent) {
        self.events.push_back(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<PlatformEvent> {
        self.events.drain(..).collect()
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for EventBus {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.pop_front()
    }
}

impl Extend<PlatformEvent> for EventBus {
    fn extend<T: IntoIterator<Item = PlatformEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}
