//! Map assembly from editor global tile ids
//!
//! The editor numbers tiles with global ids: every tileset a map references
//! starts at its own first gid. `MapBuilder` resolves those ids against the
//! declared tilesets and rewrites them into remapped tile values, assigning
//! map-tileset and entity-tileset indices in order of first use.

use crate::{
    symbol_hash, CoreError, Entity, Fraction, Layer, LayerKind, Map, Property, Result, Tileset,
    Value, TILE_INDEX_BITS, TILE_LOCAL_MASK,
};
use tracing::debug;

/// Horizontal flip bit on an editor object gid
pub const FLIP_X: u32 = 0x8000_0000;
/// Vertical flip bit on an editor object gid
pub const FLIP_Y: u32 = 0x4000_0000;

const ENTITY_FLIP_X: u16 = 0x800;
const ENTITY_FLIP_Y: u16 = 0x400;
const ENTITY_LOCAL_MASK: u16 = 0x3FF;
const MAX_TILESETS: usize = 1 << (16 - TILE_INDEX_BITS);

#[derive(Debug)]
struct DeclaredTileset {
    first_gid: u32,
    tileset: Tileset,
    map_index: Option<u16>,
    entity_index: Option<u16>,
}

/// Builds a `Map` from editor-level layers and objects
#[derive(Debug)]
pub struct MapBuilder {
    map: Map,
    tilesets: Vec<DeclaredTileset>,
    next_map_index: u16,
    next_entity_index: u16,
}

impl MapBuilder {
    /// Start a map at a tile-grid position
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            map: Map::new(x, y, width, height),
            tilesets: Vec::new(),
            next_map_index: 0,
            next_entity_index: 0,
        }
    }

    /// Declare a tileset whose global ids start at `first_gid`
    pub fn add_tileset(&mut self, first_gid: u32, tileset: Tileset) -> &mut Self {
        self.tilesets.push(DeclaredTileset {
            first_gid,
            tileset,
            map_index: None,
            entity_index: None,
        });
        self
    }

    /// Add a map property, encoding its value into a word
    pub fn add_property(&mut self, name: &str, value: &Value) -> Result<&mut Self> {
        let value = value.property_word(name)?;
        self.map.properties.push(Property {
            name: symbol_hash(name),
            value,
        });
        Ok(self)
    }

    /// Add a tile layer given raw global ids (0 is empty).
    ///
    /// The layer becomes a bounds layer when its first non-empty tile comes
    /// from a bounds tileset; mixing the two kinds is an error.
    pub fn add_layer(
        &mut self,
        name: &str,
        parallax: (f64, f64),
        gids: &[u32],
    ) -> Result<LayerKind> {
        let expected = usize::from(self.map.width) * usize::from(self.map.height);
        if gids.len() != expected {
            return Err(CoreError::LayerSize {
                expected,
                actual: gids.len(),
            });
        }

        let mut kind = LayerKind::Image;
        let mut first = true;
        let mut tiles = Vec::with_capacity(gids.len());
        for &gid in gids {
            if gid == 0 {
                tiles.push(0);
                continue;
            }
            let position = self.find_tileset(gid)?;
            let declared = &self.tilesets[position];
            let local = local_index(gid, declared.first_gid, TILE_LOCAL_MASK)?;
            let index = if declared.tileset.bounds {
                if !first && kind != LayerKind::Bounds {
                    return Err(CoreError::BoundsTileInImageLayer);
                }
                kind = LayerKind::Bounds;
                0
            } else {
                if kind == LayerKind::Bounds {
                    return Err(CoreError::ImageTileInBoundsLayer);
                }
                self.map_index(position)?
            };
            tiles.push((index << TILE_INDEX_BITS) | local);
            first = false;
        }

        debug!(layer = name, ?kind, "resolved layer tiles");
        let layer = Layer {
            name: symbol_hash(name),
            kind,
            parallax_x: Fraction::from_f64(parallax.0)?,
            parallax_y: Fraction::from_f64(parallax.1)?,
            tiles,
        };
        self.map.layers.push(layer);
        Ok(kind)
    }

    /// Add an entity, resolving its optional object gid into a tile
    /// reference. A tiled entity takes the tile size of its tileset.
    pub fn add_entity(&mut self, mut entity: Entity, gid: u32) -> Result<&mut Self> {
        let mut flips = 0u16;
        let mut gid = gid;
        if gid & FLIP_X != 0 {
            gid ^= FLIP_X;
            flips |= ENTITY_FLIP_X;
        }
        if gid & FLIP_Y != 0 {
            gid ^= FLIP_Y;
            flips |= ENTITY_FLIP_Y;
        }
        if gid != 0 {
            let position = self.find_tileset(gid)?;
            let local = local_index(gid, self.tilesets[position].first_gid, ENTITY_LOCAL_MASK)?;
            let index = self.entity_index(position)?;
            let tileset = &self.tilesets[position].tileset;
            entity.tile = (index << TILE_INDEX_BITS) | flips | local;
            entity.width = tileset.tile_width;
            entity.height = tileset.tile_height;
        }
        self.map.entities.push(entity);
        Ok(self)
    }

    /// Finish the map, ordering its tilesets by assigned index
    pub fn build(self) -> Map {
        let mut map = self.map;
        let mut map_tilesets: Vec<(u16, Tileset)> = Vec::new();
        let mut entity_tilesets: Vec<(u16, Tileset)> = Vec::new();
        for declared in self.tilesets {
            if let Some(index) = declared.map_index {
                map_tilesets.push((index, declared.tileset.clone()));
            }
            if let Some(index) = declared.entity_index {
                entity_tilesets.push((index, declared.tileset));
            }
        }
        map_tilesets.sort_by_key(|(index, _)| *index);
        entity_tilesets.sort_by_key(|(index, _)| *index);
        map.map_tilesets = map_tilesets.into_iter().map(|(_, t)| t).collect();
        map.entity_tilesets = entity_tilesets.into_iter().map(|(_, t)| t).collect();
        map
    }

    /// Last declared tileset whose first gid does not exceed `gid`
    fn find_tileset(&self, gid: u32) -> Result<usize> {
        self.tilesets
            .iter()
            .rposition(|declared| gid >= declared.first_gid)
            .ok_or(CoreError::UnknownTile { gid })
    }

    fn map_index(&mut self, position: usize) -> Result<u16> {
        if let Some(index) = self.tilesets[position].map_index {
            return Ok(index);
        }
        let index = next_index(&mut self.next_map_index, "map")?;
        self.tilesets[position].map_index = Some(index);
        Ok(index)
    }

    fn entity_index(&mut self, position: usize) -> Result<u16> {
        if let Some(index) = self.tilesets[position].entity_index {
            return Ok(index);
        }
        let index = next_index(&mut self.next_entity_index, "entity")?;
        self.tilesets[position].entity_index = Some(index);
        Ok(index)
    }
}

fn next_index(counter: &mut u16, kind: &'static str) -> Result<u16> {
    if usize::from(*counter) >= MAX_TILESETS {
        return Err(CoreError::TooManyTilesets {
            kind,
            max: MAX_TILESETS,
        });
    }
    let index = *counter;
    *counter += 1;
    Ok(index)
}

/// 1-based tile index within a tileset
fn local_index(gid: u32, first_gid: u32, mask: u16) -> Result<u16> {
    let local = gid - first_gid + 1;
    if local > u32::from(mask) {
        return Err(CoreError::TileIndexOutOfRange { local });
    }
    Ok(local as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(source: &str) -> Tileset {
        Tileset::new(source, 16, 16, 64)
    }

    fn bounds() -> Tileset {
        Tileset::new("bounds", 16, 16, 128).with_bounds(true)
    }

    #[test]
    fn test_image_layer_remap() {
        let mut builder = MapBuilder::new(0, 0, 2, 2);
        builder.add_tileset(1, image("a")).add_tileset(65, image("b"));
        let kind = builder.add_layer("ground", (1.0, 0.5), &[0, 66, 1, 3]).unwrap();
        assert_eq!(kind, LayerKind::Image);

        let map = builder.build();
        let layer = &map.layers[0];
        // "b" is used first, so it takes map index 0.
        assert_eq!(layer.tiles, vec![0, 0x0002, 0x1001, 0x1003]);
        assert_eq!(layer.parallax_y, Fraction::new(1, 2));
        assert_eq!(map.map_tilesets.len(), 2);
        assert_eq!(map.map_tilesets[0].source, "b");
        assert_eq!(map.map_tilesets[1].source, "a");
        assert!(map.entity_tilesets.is_empty());
    }

    #[test]
    fn test_bounds_layer_uses_index_zero() {
        let mut builder = MapBuilder::new(0, 0, 3, 1);
        builder.add_tileset(1, image("a")).add_tileset(65, bounds());
        let kind = builder.add_layer("collision", (1.0, 1.0), &[65, 0, 97]).unwrap();
        assert_eq!(kind, LayerKind::Bounds);
        let map = builder.build();
        assert_eq!(map.layers[0].tiles, vec![1, 0, 33]);
        assert!(map.map_tilesets.is_empty());
    }

    #[test]
    fn test_mixed_layers_rejected() {
        let mut builder = MapBuilder::new(0, 0, 2, 1);
        builder.add_tileset(1, image("a")).add_tileset(65, bounds());
        assert_eq!(
            builder.add_layer("l", (1.0, 1.0), &[1, 65]),
            Err(CoreError::BoundsTileInImageLayer)
        );
        assert_eq!(
            builder.add_layer("l", (1.0, 1.0), &[65, 1]),
            Err(CoreError::ImageTileInBoundsLayer)
        );
    }

    #[test]
    fn test_unknown_gid() {
        let mut builder = MapBuilder::new(0, 0, 1, 1);
        builder.add_tileset(10, image("a"));
        assert_eq!(
            builder.add_layer("l", (1.0, 1.0), &[3]),
            Err(CoreError::UnknownTile { gid: 3 })
        );
    }

    #[test]
    fn test_entity_flips_and_size() {
        let mut builder = MapBuilder::new(0, 0, 1, 1);
        builder
            .add_tileset(1, image("a"))
            .add_tileset(65, Tileset::new("sprites", 32, 24, 16));
        builder
            .add_entity(Entity::new(5, 10, 20), 67 | FLIP_X | FLIP_Y)
            .unwrap()
            .add_entity(Entity::new(5, 0, 0), 0)
            .unwrap();
        let map = builder.build();
        assert_eq!(map.entities[0].tile, 0x0C03);
        assert_eq!((map.entities[0].width, map.entities[0].height), (32, 24));
        assert_eq!(map.entities[1].tile, 0);
        assert_eq!(map.entity_tilesets.len(), 1);
        assert_eq!(map.entity_tilesets[0].source, "sprites");
    }

    #[test]
    fn test_property_words() {
        let mut builder = MapBuilder::new(0, 0, 1, 1);
        builder
            .add_property("music", &Value::from("cave"))
            .unwrap()
            .add_property("dark", &Value::from(true))
            .unwrap();
        let map = builder.build();
        assert_eq!(
            map.properties,
            vec![
                Property {
                    name: symbol_hash("music"),
                    value: symbol_hash("cave")
                },
                Property {
                    name: symbol_hash("dark"),
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn test_too_many_tilesets() {
        let mut builder = MapBuilder::new(0, 0, 17, 1);
        let mut gids = Vec::new();
        for i in 0..17u32 {
            builder.add_tileset(1 + i * 10, image(&format!("t{i}")));
            gids.push(1 + i * 10);
        }
        assert_eq!(
            builder.add_layer("l", (1.0, 1.0), &gids),
            Err(CoreError::TooManyTilesets {
                kind: "map",
                max: 16
            })
        );
    }
}
