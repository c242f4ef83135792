//! Process-lifetime content tables, indexed by integer identity

use crate::background::Background;
use crate::object::ObjectDefinition;
use crate::room::Room;
use crate::sprite::{KeyFrame, Sprite};
use cinder_core::{CinderError, Result};
use std::sync::Arc;

/// Every resource a game ships with, read-only once the first frame runs
#[derive(Debug, Default)]
pub struct GameContent {
    keyframes: Vec<KeyFrame>,
    sprites: Vec<Arc<Sprite>>,
    backgrounds: Vec<Background>,
    objects: Vec<Arc<ObjectDefinition>>,
    rooms: Vec<Arc<Room>>,
}

impl GameContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append keyframes and return the index of the first one
    pub fn add_keyframes(&mut self, frames: impl IntoIterator<Item = KeyFrame>) -> usize {
        let first = self.keyframes.len();
        self.keyframes.extend(frames);
        first
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> Arc<Sprite> {
        let sprite = Arc::new(sprite);
        self.sprites.push(Arc::clone(&sprite));
        sprite
    }

    pub fn add_background(&mut self, background: Background) -> usize {
        self.backgrounds.push(background);
        self.backgrounds.len() - 1
    }

    pub fn add_object(&mut self, definition: ObjectDefinition) -> Arc<ObjectDefinition> {
        let definition = Arc::new(definition);
        self.objects.push(Arc::clone(&definition));
        definition
    }

    pub fn add_room(&mut self, room: Room) -> Arc<Room> {
        let room = Arc::new(room);
        self.rooms.push(Arc::clone(&room));
        room
    }

    pub fn keyframe(&self, index: usize) -> Result<&KeyFrame> {
        self.keyframes.get(index).ok_or(CinderError::UnknownContent {
            kind: "keyframe",
            index,
        })
    }

    pub fn sprite(&self, index: usize) -> Result<&Arc<Sprite>> {
        self.sprites.get(index).ok_or(CinderError::UnknownContent {
            kind: "sprite",
            index,
        })
    }

    pub fn background(&self, index: usize) -> Result<&Background> {
        self.backgrounds.get(index).ok_or(CinderError::UnknownContent {
            kind: "background",
            index,
        })
    }

    pub fn object(&self, index: usize) -> Result<&Arc<ObjectDefinition>> {
        self.objects.get(index).ok_or(CinderError::UnknownContent {
            kind: "object",
            index,
        })
    }

    pub fn room(&self, index: usize) -> Result<&Arc<Room>> {
        self.rooms.get(index).ok_or(CinderError::UnknownContent {
            kind: "room",
            index,
        })
    }

    /// Look up an object definition by its content name
    pub fn object_named(&self, name: &str) -> Option<&Arc<ObjectDefinition>> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
