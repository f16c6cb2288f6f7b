//! Core data structures for tilebin
//!
//! This crate provides the fundamental types the compilers consume:
//! - `Tileset` - Tile table with collision boxes, animations and libraries
//! - `Map` - A placed map with properties, tilesets, layers and entities
//! - `Layer` - A single image or bounds layer with exact parallax fractions
//! - `Entity` - Placed objects with a tile reference, type and state word
//! - `Value` - Generic property value type
//! - `MapBuilder` - Resolves editor global tile ids into remapped tile values
//! - `symbol_hash` - The 32-bit name hash shared by every symbolic field

mod builder;
mod collision;
mod entity;
mod error;
mod hash;
mod layer;
mod map;
mod tileset;
mod value;

pub use builder::{MapBuilder, FLIP_X, FLIP_Y};
pub use collision::CollisionBox;
pub use entity::Entity;
pub use error::CoreError;
pub use hash::symbol_hash;
pub use layer::{Fraction, Layer, LayerKind};
pub use map::{Map, Property};
pub use tileset::{ms_to_ticks, AnimationTile, Tile, Tileset};
pub use value::Value;

/// Tiles per tileset index nibble: remapped tile values keep the tileset
/// index in the high 4 bits and the 1-based local index in the low 12 bits.
pub const TILE_INDEX_BITS: u32 = 12;

/// Mask selecting the 1-based local tile index of a remapped tile value.
pub const TILE_LOCAL_MASK: u16 = 0x0FFF;

/// Size in world units of one tile edge on the collision grid.
pub const GRID_UNIT: i32 = 16;

pub type Result<T> = std::result::Result<T, CoreError>;
