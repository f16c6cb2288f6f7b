//! Tile-local collision rectangles

use serde::{Deserialize, Serialize};

/// Axis-aligned collision rectangle in tile-local pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CollisionBox {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CollisionBox {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a box from editor coordinates, rounding to whole pixels
    pub fn from_editor(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            x.round() as u16,
            y.round() as u16,
            width.round() as u16,
            height.round() as u16,
        )
    }
}
