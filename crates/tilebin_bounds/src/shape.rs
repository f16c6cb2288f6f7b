//! Collision shape table
//!
//! A bounds tile's shape key is its 1-based local tile index minus one. The
//! key is a bit set: `SLOPE` with `DOWN`/`CEIL` picks a diagonal's
//! orientation, `HALF`/`TALL` pick half-height variants, `SOLID` is the
//! full square and `ONE_WAY` turns the outline into a single open edge.

use crate::point::Point;

pub const EMPTY: u8 = 0x00;
pub const SLOPE: u8 = 0x01;
pub const DOWN: u8 = 0x03;
pub const CEIL: u8 = 0x04;
pub const HALF: u8 = 0x08;
pub const TALL: u8 = 0x11;
pub const SOLID: u8 = 0x20;
pub use crate::point::ONE_WAY;

const fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

static SHAPES: [(u8, &[Point]); 34] = [
    (EMPTY, &[]),
    (SOLID, &[p(0, 0), p(16, 0), p(16, 16), p(0, 16)]),
    (SLOPE, &[p(0, 16), p(16, 0), p(16, 16)]),
    (SLOPE | DOWN, &[p(0, 0), p(16, 16), p(0, 16)]),
    (SLOPE | DOWN | CEIL, &[p(0, 0), p(16, 0), p(16, 16)]),
    (SLOPE | CEIL, &[p(0, 0), p(16, 0), p(0, 16)]),
    (SLOPE | HALF, &[p(0, 16), p(16, 8), p(16, 16)]),
    (SLOPE | HALF | TALL, &[p(0, 8), p(16, 0), p(16, 16), p(0, 16)]),
    (SLOPE | HALF | TALL | DOWN, &[p(0, 0), p(16, 8), p(16, 16), p(0, 16)]),
    (SLOPE | HALF | DOWN, &[p(0, 8), p(16, 16), p(0, 16)]),
    (SLOPE | HALF | CEIL, &[p(0, 0), p(16, 0), p(0, 8)]),
    (SLOPE | HALF | CEIL | TALL, &[p(0, 0), p(16, 0), p(16, 8), p(0, 16)]),
    (SLOPE | HALF | CEIL | TALL | DOWN, &[p(0, 0), p(16, 0), p(16, 16), p(0, 8)]),
    (SLOPE | HALF | CEIL | DOWN, &[p(0, 0), p(16, 0), p(16, 8)]),
    (HALF, &[p(0, 8), p(16, 8), p(16, 16), p(0, 16)]),
    (HALF | CEIL, &[p(0, 0), p(16, 0), p(16, 8), p(0, 8)]),
    (ONE_WAY | SOLID, &[p(0, 0), p(16, 0)]),
    ((ONE_WAY | SOLID) + 1, &[p(16, 0), p(16, 16)]),
    ((ONE_WAY | SOLID) + 2, &[p(16, 16), p(0, 16)]),
    ((ONE_WAY | SOLID) + 3, &[p(0, 16), p(0, 0)]),
    (ONE_WAY | SLOPE, &[p(0, 16), p(16, 0)]),
    (ONE_WAY | SLOPE | DOWN, &[p(0, 0), p(16, 16)]),
    (ONE_WAY | SLOPE | DOWN | CEIL, &[p(16, 16), p(0, 0)]),
    (ONE_WAY | SLOPE | CEIL, &[p(16, 0), p(0, 16)]),
    (ONE_WAY | SLOPE | HALF, &[p(0, 16), p(16, 8)]),
    (ONE_WAY | SLOPE | HALF | TALL, &[p(0, 8), p(16, 0)]),
    (ONE_WAY | SLOPE | HALF | TALL | DOWN, &[p(0, 0), p(16, 8)]),
    (ONE_WAY | SLOPE | HALF | DOWN, &[p(0, 8), p(16, 16)]),
    (ONE_WAY | SLOPE | HALF | CEIL, &[p(16, 0), p(0, 8)]),
    (ONE_WAY | SLOPE | HALF | CEIL | TALL, &[p(16, 8), p(0, 16)]),
    (ONE_WAY | SLOPE | HALF | CEIL | TALL | DOWN, &[p(16, 16), p(0, 8)]),
    (ONE_WAY | SLOPE | HALF | CEIL | DOWN, &[p(16, 8), p(0, 0)]),
    (ONE_WAY | HALF, &[p(0, 8), p(16, 8)]),
    (ONE_WAY | HALF | CEIL, &[p(16, 8), p(0, 8)]),
];

/// Tile-local outline for a shape key, or `None` for an unknown key
pub fn shape(key: u16) -> Option<&'static [Point]> {
    let key = u8::try_from(key).ok()?;
    SHAPES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, points)| *points)
}

/// Whether the key describes a one-way edge
pub fn is_one_way(key: u16) -> bool {
    key & u16::from(ONE_WAY) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<u8> = SHAPES.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), SHAPES.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(shape(0x20).unwrap().len(), 4);
        assert_eq!(shape(0).unwrap().len(), 0);
        assert_eq!(shape(0x61).unwrap(), &[p(16, 0), p(16, 16)]);
        assert!(shape(0x02).is_none());
        assert!(shape(0x1FF).is_none());
    }

    #[test]
    fn test_one_way_shapes_are_segments() {
        for (key, points) in SHAPES.iter() {
            if is_one_way(u16::from(*key)) {
                assert_eq!(points.len(), 2, "key {key:#x}");
            } else if *key != EMPTY {
                assert!(points.len() >= 3, "key {key:#x}");
            }
        }
    }
}
