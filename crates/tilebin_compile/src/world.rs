//! World binaries: every map of a world plus its collision boundaries

use crate::entity::{EntityPlan, EntityPlanner, EntityTypes};
use crate::map::{read_map, write_map, MapView};
use crate::Result;
use tilebin_bounds::{extract_boundaries, Boundary, Point};
use tilebin_core::Map;
use tilebin_layout::{two_pass, Cursor, Layout, OffsetQueue};
use tracing::{debug, info};

/// Compiled world bytes with the boundaries they contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledWorld {
    pub bytes: Vec<u8>,
    pub boundaries: Vec<Boundary>,
}

pub fn write_boundary(boundary: &Boundary, out: &mut Layout<'_>) -> tilebin_layout::Result<usize> {
    let start = out.position();
    out.u8(boundary.flags)?;
    out.count_u16("point_count", boundary.points.len())?;
    for point in &boundary.points {
        out.i32(point.x)?;
        out.i32(point.y)?;
    }
    Ok(out.since(start))
}

/// Write the world table, each map embedded at its absolute offset, then
/// the boundary records.
pub fn write_world(
    maps: &[Map],
    plans: &[EntityPlan],
    boundaries: &[Boundary],
    out: &mut Layout<'_>,
) -> tilebin_layout::Result<usize> {
    let start = out.position();
    let mut map_offsets = OffsetQueue::new("map");
    let mut boundary_offsets = OffsetQueue::new("boundary");

    out.count_u16("map_count", maps.len())?;
    for _ in maps {
        out.reserve(&mut map_offsets)?;
    }
    out.count_u16("boundary_count", boundaries.len())?;
    for _ in boundaries {
        out.reserve(&mut boundary_offsets)?;
    }

    for (map, plan) in maps.iter().zip(plans) {
        map_offsets.resolve_here(out)?;
        out.embed(|sub| write_map(map, plan, sub))?;
    }
    for boundary in boundaries {
        boundary_offsets.resolve_here(out)?;
        write_boundary(boundary, out)?;
    }

    let resolved = map_offsets.finish()? + boundary_offsets.finish()?;
    debug!(resolved, measuring = out.is_measuring(), "world offsets resolved");
    Ok(out.since(start))
}

/// Compile a world: extract its boundaries, plan its entities, then lay
/// out the binary.
pub fn compile_world(maps: &[Map], types: &EntityTypes) -> Result<CompiledWorld> {
    for map in maps {
        map.validate()?;
    }
    let boundaries = extract_boundaries(maps)?;

    let mut planner = EntityPlanner::new(types);
    let plans = maps
        .iter()
        .map(|map| planner.plan(&map.entities))
        .collect::<Result<Vec<_>>>()?;

    let bytes = two_pass(|out| write_world(maps, &plans, &boundaries, out).map(|_| ()))?;
    info!(
        maps = maps.len(),
        boundaries = boundaries.len(),
        bytes = bytes.len(),
        "compiled world"
    );
    Ok(CompiledWorld { bytes, boundaries })
}

/// A compiled world read back through its offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldView {
    pub map_offsets: Vec<u32>,
    pub maps: Vec<MapView>,
    pub boundary_offsets: Vec<u32>,
    pub boundaries: Vec<Boundary>,
}

pub fn read_world(data: &[u8]) -> tilebin_layout::Result<WorldView> {
    let mut cursor = Cursor::new(data);
    let map_count = cursor.read_u16()?;
    let map_offsets = cursor.read_offsets(usize::from(map_count))?;
    let boundary_count = cursor.read_u16()?;
    let boundary_offsets = cursor.read_offsets(usize::from(boundary_count))?;

    let maps = map_offsets
        .iter()
        .map(|&offset| read_map(data, offset))
        .collect::<tilebin_layout::Result<Vec<_>>>()?;
    let boundaries = boundary_offsets
        .iter()
        .map(|&offset| read_boundary(&cursor.at(offset)))
        .collect::<tilebin_layout::Result<Vec<_>>>()?;

    Ok(WorldView {
        map_offsets,
        maps,
        boundary_offsets,
        boundaries,
    })
}

fn read_boundary(cursor: &Cursor<'_>) -> tilebin_layout::Result<Boundary> {
    let mut cursor = cursor.clone();
    let flags = cursor.read_u8()?;
    let count = cursor.read_u16()?;
    let points = (0..count)
        .map(|_| -> tilebin_layout::Result<Point> {
            Ok(Point::new(cursor.read_i32()?, cursor.read_i32()?))
        })
        .collect::<tilebin_layout::Result<Vec<_>>>()?;
    Ok(Boundary { flags, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilebin_bounds::ONE_WAY;

    #[test]
    fn test_boundary_record() {
        let boundary = Boundary::one_way(vec![Point::new(-1, 2), Point::new(3, 4)]);
        let bytes = two_pass(|out| write_boundary(&boundary, out).map(|_| ())).unwrap();
        assert_eq!(bytes.len(), 1 + 2 + 2 * 8);
        assert_eq!(bytes[0], ONE_WAY);
        assert_eq!(&bytes[1..3], &[2, 0]);
        assert_eq!(&bytes[3..7], &(-1i32).to_le_bytes());
        assert_eq!(read_boundary(&Cursor::new(&bytes)).unwrap(), boundary);
    }

    #[test]
    fn test_empty_world() {
        let world = compile_world(&[], &EntityTypes::default()).unwrap();
        assert_eq!(world.bytes, vec![0, 0, 0, 0]);
        let view = read_world(&world.bytes).unwrap();
        assert!(view.maps.is_empty());
        assert!(view.boundaries.is_empty());
    }

    #[test]
    fn test_map_offsets_follow_table() {
        let maps = [Map::new(0, 0, 0, 0), Map::new(1, 0, 0, 0)];
        let world = compile_world(&maps, &EntityTypes::default()).unwrap();
        let view = read_world(&world.bytes).unwrap();
        // Table: map_count, two offsets, boundary_count.
        assert_eq!(view.map_offsets[0], 2 + 8 + 2);
        // An empty map header is 14 bytes.
        assert_eq!(view.map_offsets[1], 2 + 8 + 2 + 14);
        assert_eq!(view.maps[1].x, 1);
        assert_eq!(world.bytes.len(), 12 + 28);
    }
}
