//! Cinder Runtime - Room simulation core
//!
//! Runs the live instances of the active room through a fixed per-frame
//! phase sequence and dispatches their object hooks:
//! - `RoomEnvironment` - owns the instances, runs `update()` and `draw()`
//! - `ObjectDefinition` / `ObjectBehavior` - shared object types and hooks
//! - `ObjectInstance` / `Timer` - per-entity state with 12 alarm slots
//! - `Room` / `GameContent` - static content the environment consumes
//! - `PlatformEvent` / `EventBus` / `InputState` - input entering the frame
//! - `Surface` - presentation boundary for drawing
//! - `GameClock` - paces frames at the room speed

mod background;
mod clock;
mod collision;
mod config;
mod content;
mod context;
mod environment;
mod event;
mod event_bus;
#[cfg(test)]
mod frame_phases;
mod input;
mod object;
mod room;
mod sprite;
mod surface;
mod timer;

pub use background::{Background, TileFormat};
pub use clock::GameClock;
pub use collision::{BoundingBoxOverlap, CollisionPredicate};
pub use config::{RuntimeConfig, ZeroDurationPolicy};
pub use content::GameContent;
pub use context::FrameContext;
pub use environment::{FrameOutcome, RoomEnvironment};
pub use event::{EventSource, NoEvents, PlatformEvent};
pub use event_bus::EventBus;
pub use input::InputState;
pub use object::{NoBehavior, ObjectBehavior, ObjectDefinition, ObjectInstance, MAX_HEALTH, TIMER_SLOTS};
pub use room::{Room, RoomSetup};
pub use sprite::{KeyFrame, Sprite, SpriteInstance};
pub use surface::{NullSurface, Surface};
pub use timer::Timer;

pub use winit::keyboard::KeyCode;
