//! Tileset binary records
//!
//! A compiled tileset is laid out breadth first: header, source string,
//! tile records in index order, collision-type records, box lists, then
//! the library strings. Every offset is absolute in the output the tileset
//! is written into, so the same writer serves standalone tileset files and
//! tilesets embedded in a map.

use crate::Result;
use std::collections::BTreeMap;
use tilebin_core::{AnimationTile, CollisionBox, Tile, Tileset};
use tilebin_layout::{two_pass, Cursor, Layout, OffsetQueue};
use tracing::info;

/// Offset queues shared by the records of one tileset
#[derive(Debug)]
pub struct TilesetQueues {
    pub strings: OffsetQueue,
    pub tiles: OffsetQueue,
    pub collision_types: OffsetQueue,
    pub box_lists: OffsetQueue,
}

impl TilesetQueues {
    pub fn new() -> Self {
        Self {
            strings: OffsetQueue::new("string"),
            tiles: OffsetQueue::new("tile"),
            collision_types: OffsetQueue::new("collision type"),
            box_lists: OffsetQueue::new("box list"),
        }
    }

    /// Check every queue drained, returning the number of offsets resolved
    pub fn finish(self) -> tilebin_layout::Result<usize> {
        Ok(self.strings.finish()?
            + self.tiles.finish()?
            + self.collision_types.finish()?
            + self.box_lists.finish()?)
    }
}

impl Default for TilesetQueues {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_tileset_header(
    tileset: &Tileset,
    out: &mut Layout<'_>,
    queues: &mut TilesetQueues,
) -> tilebin_layout::Result<usize> {
    let start = out.position();
    out.u16(tileset.tile_count)?;
    out.u16(tileset.tile_width)?;
    out.u16(tileset.tile_height)?;
    out.reserve(&mut queues.strings)?;
    out.count_u8("tile_table_count", tileset.tiles.len())?;
    for _ in &tileset.tiles {
        out.reserve(&mut queues.tiles)?;
    }
    out.reserve(&mut queues.strings)?;
    Ok(out.since(start))
}

pub fn write_tile(
    index: u16,
    tile: &Tile,
    out: &mut Layout<'_>,
    queues: &mut TilesetQueues,
) -> tilebin_layout::Result<usize> {
    let start = out.position();
    out.u16(index)?;
    out.u32(tile.name)?;
    out.count_u16("collision_type_count", tile.collision_boxes.len())?;
    for _ in tile.collision_boxes.keys() {
        out.reserve(&mut queues.collision_types)?;
    }
    out.count_u8("animation_count", tile.animation.len())?;
    for frame in &tile.animation {
        out.u16(frame.tile_id)?;
        out.u16(frame.duration)?;
    }
    out.reserve(&mut queues.strings)?;
    Ok(out.since(start))
}

pub fn write_collision_type(
    type_hash: u32,
    lists: &BTreeMap<u32, Vec<CollisionBox>>,
    out: &mut Layout<'_>,
    queues: &mut TilesetQueues,
) -> tilebin_layout::Result<usize> {
    let start = out.position();
    out.u32(type_hash)?;
    out.count_u16("box_list_count", lists.len())?;
    for _ in lists.keys() {
        out.reserve(&mut queues.box_lists)?;
    }
    Ok(out.since(start))
}

pub fn write_collision_box_list(
    name_hash: u32,
    boxes: &[CollisionBox],
    out: &mut Layout<'_>,
) -> tilebin_layout::Result<usize> {
    let start = out.position();
    out.u32(name_hash)?;
    out.count_u16("box_count", boxes.len())?;
    for b in boxes {
        out.u16(b.x)?;
        out.u16(b.y)?;
        out.u16(b.width)?;
        out.u16(b.height)?;
    }
    Ok(out.since(start))
}

/// Write a whole tileset at the cursor
pub fn write_tileset(tileset: &Tileset, out: &mut Layout<'_>) -> tilebin_layout::Result<usize> {
    let start = out.position();
    let mut queues = TilesetQueues::new();

    write_tileset_header(tileset, out, &mut queues)?;
    queues.strings.resolve_here(out)?;
    out.cstr(&tileset.source)?;

    for (&index, tile) in &tileset.tiles {
        queues.tiles.resolve_here(out)?;
        write_tile(index, tile, out, &mut queues)?;
    }
    for tile in tileset.tiles.values() {
        for (&type_hash, lists) in &tile.collision_boxes {
            queues.collision_types.resolve_here(out)?;
            write_collision_type(type_hash, lists, out, &mut queues)?;
        }
    }
    for tile in tileset.tiles.values() {
        for lists in tile.collision_boxes.values() {
            for (&name, boxes) in lists {
                queues.box_lists.resolve_here(out)?;
                write_collision_box_list(name, boxes, out)?;
            }
        }
    }

    queues.strings.resolve_here(out)?;
    out.cstr(&tileset.library)?;
    for tile in tileset.tiles.values() {
        queues.strings.resolve_here(out)?;
        out.cstr(&tile.library)?;
    }

    queues.finish()?;
    Ok(out.since(start))
}

/// Compile a standalone tileset binary
pub fn compile_tileset(tileset: &Tileset) -> Result<Vec<u8>> {
    let bytes = two_pass(|out| write_tileset(tileset, out).map(|_| ()))?;
    info!(
        source = %tileset.source,
        tiles = tileset.tiles.len(),
        bytes = bytes.len(),
        "compiled tileset"
    );
    Ok(bytes)
}

/// Read back the tileset written at `offset`.
///
/// Image layout fields (margin, spacing, columns) and the bounds marker are
/// not part of the binary and come back as defaults.
pub fn read_tileset(data: &[u8], offset: u32) -> tilebin_layout::Result<Tileset> {
    let mut cursor = Cursor::new(data).at(offset);
    let tile_count = cursor.read_u16()?;
    let tile_width = cursor.read_u16()?;
    let tile_height = cursor.read_u16()?;
    let source = cursor.read_cstr_ref()?;
    let table_count = cursor.read_u8()?;
    let tile_offsets = cursor.read_offsets(usize::from(table_count))?;
    let library = cursor.read_cstr_ref()?;

    let mut tileset =
        Tileset::new(source, tile_width, tile_height, tile_count).with_library(library);
    for tile_offset in tile_offsets {
        let (index, tile) = read_tile(&cursor.at(tile_offset))?;
        tileset.tiles.insert(index, tile);
    }
    Ok(tileset)
}

fn read_tile(cursor: &Cursor<'_>) -> tilebin_layout::Result<(u16, Tile)> {
    let mut cursor = cursor.clone();
    let index = cursor.read_u16()?;
    let mut tile = Tile::new().with_name(cursor.read_u32()?);
    let type_count = cursor.read_u16()?;
    let type_offsets = cursor.read_offsets(usize::from(type_count))?;
    let frame_count = cursor.read_u8()?;
    for _ in 0..frame_count {
        let tile_id = cursor.read_u16()?;
        let duration = cursor.read_u16()?;
        tile.animation.push(AnimationTile::new(tile_id, duration));
    }
    tile.library = cursor.read_cstr_ref()?.to_string();

    for type_offset in type_offsets {
        let mut record = cursor.at(type_offset);
        let type_hash = record.read_u32()?;
        let list_count = record.read_u16()?;
        let lists = tile.collision_boxes.entry(type_hash).or_default();
        for list_offset in record.read_offsets(usize::from(list_count))? {
            let mut list = cursor.at(list_offset);
            let name = list.read_u32()?;
            let box_count = list.read_u16()?;
            let boxes = lists.entry(name).or_default();
            for _ in 0..box_count {
                boxes.push(CollisionBox::new(
                    list.read_u16()?,
                    list.read_u16()?,
                    list.read_u16()?,
                    list.read_u16()?,
                ));
            }
        }
    }
    Ok((index, tile))
}
