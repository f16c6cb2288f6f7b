//! Entity placed on a map object layer

use serde::{Deserialize, Serialize};

/// An entity placed on a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Entity {
    /// Hashed name of the object layer the entity was placed on
    pub layer_name: u32,
    /// Position in map pixels
    pub x: u16,
    pub y: u16,
    /// Extent used for the spatial sort orders
    #[serde(default)]
    pub width: u16,
    #[serde(default)]
    pub height: u16,
    /// Remapped entity-tileset tile with flip bits, 0 when the entity has no tile
    #[serde(default)]
    pub tile: u16,
    /// Symbolic type, resolved against the entity type configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Initial state word
    #[serde(default)]
    pub state: u32,
}

impl Entity {
    /// Create an untyped entity at a position
    pub fn new(layer_name: u32, x: u16, y: u16) -> Self {
        Self {
            layer_name,
            x,
            y,
            ..Default::default()
        }
    }

    /// Set the symbolic type
    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Set the size
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the state word
    pub fn with_state(mut self, state: u32) -> Self {
        self.state = state;
        self
    }

    /// Right edge, widened so it cannot overflow
    pub fn max_x(&self) -> u32 {
        u32::from(self.x) + u32::from(self.width)
    }

    /// Bottom edge, widened so it cannot overflow
    pub fn max_y(&self) -> u32 {
        u32::from(self.y) + u32::from(self.height)
    }
}
