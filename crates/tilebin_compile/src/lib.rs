//! Tileset and world compilers for tilebin
//!
//! Every record writer runs against a [`tilebin_layout::Layout`] twice,
//! once to measure and once to write, so a compiled file is allocated
//! exactly once. Readers walk the same records back through their absolute
//! offsets.
//!
//! - `compile_tileset` / `read_tileset` - Standalone tileset binaries
//! - `compile_world` / `read_world` - Maps, embedded tilesets and boundaries
//! - `EntityTypes` - Entity type configuration loaded from TOML

mod entity;
mod error;
mod map;
mod tileset;
mod world;

pub use entity::{EntityPlan, EntityPlanner, EntityTypes, SortOrders};
pub use error::{CompileError, Result};
pub use map::{read_map, write_entity, write_layer, write_map, EntityRecord, MapView};
pub use tileset::{
    compile_tileset, read_tileset, write_collision_box_list, write_collision_type, write_tile,
    write_tileset, write_tileset_header, TilesetQueues,
};
pub use world::{compile_world, read_world, write_boundary, write_world, CompiledWorld, WorldView};
