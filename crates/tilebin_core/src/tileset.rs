//! Tileset configuration with per-tile collision, animation and libraries

use crate::{CollisionBox, CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime frame rate that animation durations are expressed in
pub const TICKS_PER_SECOND: u32 = 60;

/// Convert an editor frame duration in milliseconds to runtime ticks
pub fn ms_to_ticks(ms: f64) -> u16 {
    (f64::from(TICKS_PER_SECOND) * ms / 1000.0) as u16
}

/// One frame of a tile animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnimationTile {
    /// Tile index within the same tileset
    pub tile_id: u16,
    /// Frame duration in 60 Hz ticks
    pub duration: u16,
}

impl AnimationTile {
    pub fn new(tile_id: u16, duration: u16) -> Self {
        Self { tile_id, duration }
    }
}

/// Per-tile metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tile {
    /// Hashed tile name (0 when unnamed)
    #[serde(default)]
    pub name: u32,
    /// `collision type hash -> box name hash -> boxes`, iterated in key order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub collision_boxes: BTreeMap<u32, BTreeMap<u32, Vec<CollisionBox>>>,
    /// Animation frames in playback order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animation: Vec<AnimationTile>,
    /// Library identifier the runtime dispatches tile behavior through
    #[serde(default)]
    pub library: String,
}

impl Tile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hashed name
    pub fn with_name(mut self, name: u32) -> Self {
        self.name = name;
        self
    }

    /// Set the library identifier
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    /// Append an animation frame
    pub fn with_frame(mut self, tile_id: u16, duration: u16) -> Self {
        self.animation.push(AnimationTile::new(tile_id, duration));
        self
    }

    /// Append a collision box under `(type, name)`
    pub fn with_box(mut self, kind: u32, name: u32, collision_box: CollisionBox) -> Self {
        self.push_box(kind, name, collision_box);
        self
    }

    /// Record a collision object read from the editor.
    ///
    /// Every collision object must carry a type; the name may be absent and
    /// hashes as the empty string.
    pub fn add_collision_object(
        &mut self,
        kind: Option<u32>,
        name: u32,
        collision_box: CollisionBox,
    ) -> Result<()> {
        let kind = kind.ok_or(CoreError::MissingCollisionType)?;
        self.push_box(kind, name, collision_box);
        Ok(())
    }

    fn push_box(&mut self, kind: u32, name: u32, collision_box: CollisionBox) {
        self.collision_boxes
            .entry(kind)
            .or_default()
            .entry(name)
            .or_default()
            .push(collision_box);
    }
}

/// Tileset definition: tile geometry, image source and tile table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tileset {
    /// Number of tiles in the image
    pub tile_count: u16,
    pub tile_width: u16,
    pub tile_height: u16,
    #[serde(default)]
    pub margin: u16,
    #[serde(default)]
    pub spacing: u16,
    #[serde(default)]
    pub columns: u16,
    /// Image identifier: file name without directory or extension
    pub source: String,
    /// Library identifier for the tileset as a whole
    #[serde(default)]
    pub library: String,
    /// Tiles that carry metadata, keyed by tile index
    #[serde(default)]
    pub tiles: BTreeMap<u16, Tile>,
    /// Collision-geometry tileset rather than an image tileset
    #[serde(default)]
    pub bounds: bool,
}

impl Tileset {
    /// Create an image tileset with square-grid geometry and no tile metadata
    pub fn new(
        source: impl Into<String>,
        tile_width: u16,
        tile_height: u16,
        tile_count: u16,
    ) -> Self {
        Self {
            tile_count,
            tile_width,
            tile_height,
            source: source.into(),
            ..Default::default()
        }
    }

    /// Mark this as a collision-geometry tileset
    pub fn with_bounds(mut self, bounds: bool) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the library identifier
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    /// Set margin, spacing and column count
    pub fn with_layout(mut self, margin: u16, spacing: u16, columns: u16) -> Self {
        self.margin = margin;
        self.spacing = spacing;
        self.columns = columns;
        self
    }

    /// Insert or replace tile metadata
    pub fn with_tile(mut self, index: u16, tile: Tile) -> Self {
        self.tiles.insert(index, tile);
        self
    }

    /// Derive the image identifier from an image path: the file name with
    /// any directory and extension removed.
    pub fn source_from_path(path: &str) -> String {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file_name.rfind('.') {
            Some(dot) if dot > 0 => file_name[..dot].to_string(),
            _ => file_name.to_string(),
        }
    }

    /// Size of the image once margin and spacing are stripped out.
    ///
    /// Rows are counted by walking down the source image height; the height
    /// must end exactly on a tile boundary.
    pub fn packed_image_size(&self, image_height: u32) -> Result<(u32, u32)> {
        let tile_height = i64::from(self.tile_height);
        let mut height = i64::from(image_height) - 2 * i64::from(self.margin);
        let mut rows = 0u32;
        while height > tile_height {
            rows += 1;
            height -= tile_height + i64::from(self.spacing);
        }
        if height != tile_height {
            return Err(CoreError::TilesetGeometry {
                height: image_height,
                tile_height: self.tile_height,
            });
        }
        rows += 1;
        Ok((
            u32::from(self.tile_width) * u32::from(self.columns),
            u32::from(self.tile_height) * rows,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol_hash;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(1000.0), 60);
        assert_eq!(ms_to_ticks(100.0), 6);
        assert_eq!(ms_to_ticks(10.0), 0);
    }

    #[test]
    fn test_source_from_path() {
        assert_eq!(Tileset::source_from_path("../img/cave.png"), "cave");
        assert_eq!(Tileset::source_from_path("cave.png"), "cave");
        assert_eq!(Tileset::source_from_path("cave"), "cave");
    }

    #[test]
    fn test_collision_object_requires_type() {
        let mut tile = Tile::new();
        let b = CollisionBox::new(0, 0, 16, 16);
        assert_eq!(
            tile.add_collision_object(None, 0, b),
            Err(CoreError::MissingCollisionType)
        );
        tile.add_collision_object(Some(symbol_hash("hit")), symbol_hash("body"), b)
            .unwrap();
        tile.add_collision_object(Some(symbol_hash("hit")), symbol_hash("body"), b)
            .unwrap();
        assert_eq!(tile.collision_boxes[&symbol_hash("hit")].len(), 1);
        assert_eq!(tile.collision_boxes[&symbol_hash("hit")][&symbol_hash("body")].len(), 2);
    }

    #[test]
    fn test_packed_image_size() {
        // 2px margin, 1px spacing, three rows of 16px tiles.
        let tileset = Tileset::new("t", 16, 16, 12).with_layout(2, 1, 4);
        assert_eq!(tileset.packed_image_size(2 + 16 + 1 + 16 + 1 + 16 + 2).unwrap(), (64, 48));

        let plain = Tileset::new("t", 16, 16, 4).with_layout(0, 0, 4);
        assert_eq!(plain.packed_image_size(16).unwrap(), (64, 16));
    }

    #[test]
    fn test_packed_image_size_rejects_bad_height() {
        let tileset = Tileset::new("t", 16, 16, 12).with_layout(0, 0, 4);
        assert!(matches!(
            tileset.packed_image_size(40),
            Err(CoreError::TilesetGeometry { height: 40, .. })
        ));
    }

    #[test]
    fn test_tileset_json() {
        let tileset = Tileset::new("cave", 16, 16, 4)
            .with_library("cave_lib")
            .with_tile(2, Tile::new().with_name(symbol_hash("spike")).with_frame(3, 6));
        let json = serde_json::to_string(&tileset).unwrap();
        let parsed: Tileset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tileset);
    }
}
