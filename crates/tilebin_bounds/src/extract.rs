//! World boundary extraction from bounds layers

use crate::error::{BoundsError, Result};
use crate::lines::merge_lines;
use crate::merge::merge_solid;
use crate::point::{Boundary, Point};
use crate::shape::{is_one_way, shape};
use tilebin_core::{Layer, Map, GRID_UNIT, TILE_LOCAL_MASK};
use tracing::{debug, info};

/// Outline of a map's extent, wound opposite to tile outlines so that solid
/// tiles touching the edge carve into it.
fn frame(map: &Map) -> Boundary {
    let (x, y) = (i32::from(map.x), i32::from(map.y));
    let (w, h) = (i32::from(map.width), i32::from(map.height));
    let points = [(x, y), (x, y + h), (x + w, y + h), (x + w, y)]
        .into_iter()
        .map(|(px, py)| Point::new(px * GRID_UNIT, py * GRID_UNIT))
        .collect();
    Boundary::new(points)
}

/// Extract the collision boundaries of a whole world.
///
/// Solid boundaries come first, each closed by repeating its first point,
/// followed by the open one-way lines. Map frames only serve as scaffolding
/// for tiles on a map edge and never appear in the output unchanged.
pub fn extract_boundaries(maps: &[Map]) -> Result<Vec<Boundary>> {
    let mut scaffold: Vec<Boundary> = maps.iter().map(frame).collect();
    merge_solid(&mut scaffold)?;

    let mut solid = scaffold.clone();
    let mut one_way = Vec::new();
    for map in maps {
        let origin = (i32::from(map.x), i32::from(map.y));
        for layer in map.bounds_layers() {
            layer.check_size(map.width, map.height)?;
            push_layer_tiles(map, layer, origin, &mut solid, &mut one_way)?;
        }
    }
    debug!(solid = solid.len(), one_way = one_way.len(), "collected tile outlines");

    merge_solid(&mut solid)?;
    solid.retain(|boundary| !scaffold.iter().any(|frame| frame.same_cycle(boundary)));
    for boundary in solid.iter_mut() {
        boundary.close();
    }
    merge_lines(&mut one_way);

    info!(
        maps = maps.len(),
        solid = solid.len(),
        one_way = one_way.len(),
        "extracted boundaries"
    );
    solid.append(&mut one_way);
    Ok(solid)
}

fn push_layer_tiles(
    map: &Map,
    layer: &Layer,
    (map_x, map_y): (i32, i32),
    solid: &mut Vec<Boundary>,
    one_way: &mut Vec<Boundary>,
) -> Result<()> {
    for ty in 0..map.height {
        for tx in 0..map.width {
            let Some(tile) = layer.tile_at(tx, ty, map.width) else {
                continue;
            };
            let Some(key) = (tile & TILE_LOCAL_MASK).checked_sub(1) else {
                continue;
            };
            let outline = shape(key).ok_or(BoundsError::UnknownShape { tile, x: tx, y: ty })?;
            if outline.is_empty() {
                continue;
            }
            let dx = (map_x + i32::from(tx)) * GRID_UNIT;
            let dy = (map_y + i32::from(ty)) * GRID_UNIT;
            let points = outline.iter().map(|p| p.offset(dx, dy)).collect();
            if is_one_way(key) {
                one_way.push(Boundary::one_way(points));
            } else {
                solid.push(Boundary::new(points));
            }
        }
    }
    Ok(())
}
