//! A single map placed in a world

use crate::{Entity, Layer, Result, Tileset};
use serde::{Deserialize, Serialize};

/// Hashed property name and its encoded value word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: u32,
    pub value: u32,
}

/// A map with its tilesets, layers and entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Map {
    /// Position on the world tile grid
    pub x: i16,
    pub y: i16,
    /// Size in tiles
    pub width: u16,
    pub height: u16,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Tilesets referenced by image layers, ordered by remapped index
    #[serde(default)]
    pub map_tilesets: Vec<Tileset>,
    /// Tilesets referenced by entity tiles, ordered by remapped index
    #[serde(default)]
    pub entity_tilesets: Vec<Tileset>,
    /// Image and bounds layers in editor order
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Map {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    /// Image layers in order; these are the layers embedded in the binary
    pub fn image_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| !layer.is_bounds())
    }

    /// Bounds layers in order; these feed boundary extraction
    pub fn bounds_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.is_bounds())
    }

    /// Check every layer grid matches the map size
    pub fn validate(&self) -> Result<()> {
        for layer in &self.layers {
            layer.check_size(self.width, self.height)?;
        }
        Ok(())
    }
}
