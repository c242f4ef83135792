//! Background resources

use serde::{Deserialize, Serialize};
use cinder_core::Vector2;

/// Tile grid layout when a background is used as a tileset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileFormat {
    pub offset: Vector2,
    pub separation: Vector2,
    pub size: Vector2,
}

impl TileFormat {
    /// Top-left pixel of tile `(column, row)` inside the source image
    pub fn tile_origin(&self, column: i32, row: i32) -> Vector2 {
        self.offset + (self.size + self.separation) * Vector2::new(column, row)
    }
}

/// Shared, immutable background image descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub path: String,
    pub smooth_edges: bool,
    pub transparent: bool,
    pub preload: bool,
    /// Present when the image is sliced into tiles
    #[serde(default)]
    pub tiles: Option<TileFormat>,
}

impl Background {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            smooth_edges: false,
            transparent: false,
            preload: true,
            tiles: None,
        }
    }

    pub fn with_tiles(mut self, tiles: TileFormat) -> Self {
        self.tiles = Some(tiles);
        self
    }

    pub fn is_tileset(&self) -> bool {
        self.tiles.is_some()
    }
}
