//! Platform events consumed by the room's event phase

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A window or input event, classified for the simulation core
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The window was closed or the platform asked the game to stop
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Mouse button index: 0 = left, 1 = right, 2 = middle
    MouseButtonDown(u32),
    MouseButtonUp(u32),
    MouseMoved { x: f64, y: f64 },
}

impl PlatformEvent {
    /// Classify a winit window event. Events the core has no dispatch point
    /// for map to `None`.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(PlatformEvent::Quit),
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return None;
                };
                // Auto-repeat is a host concern; held keys are tracked by InputState
                if event.repeat {
                    return None;
                }
                match event.state {
                    ElementState::Pressed => Some(PlatformEvent::KeyDown(key)),
                    ElementState::Released => Some(PlatformEvent::KeyUp(key)),
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let index = mouse_button_index(*button)?;
                match state {
                    ElementState::Pressed => Some(PlatformEvent::MouseButtonDown(index)),
                    ElementState::Released => Some(PlatformEvent::MouseButtonUp(index)),
                }
            }
            WindowEvent::CursorMoved { position, .. } => Some(PlatformEvent::MouseMoved {
                x: position.x,
                y: position.y,
            }),
            _ => None,
        }
    }
}

fn mouse_button_index(button: MouseButton) -> Option<u32> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Back => Some(3),
        MouseButton::Forward => Some(4),
        MouseButton::Other(_) => None,
    }
}

/// Anything the event phase can drain pending platform events from
pub trait EventSource {
    /// Next pending event, or `None` once this frame's queue is empty
    fn poll_event(&mut self) -> Option<PlatformEvent>;
}

/// A source with nothing to report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        None
    }
}
