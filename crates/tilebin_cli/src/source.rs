//! Editor-level JSON sources
//!
//! These mirror what a level editor exports: tilesets with image geometry
//! and per-tile collision objects, maps with raw global tile ids, decimal
//! parallax factors and typed properties. They are converted into the core
//! types before compilation.

use serde::{Deserialize, Serialize};
use tilebin_core::{
    ms_to_ticks, symbol_hash, CollisionBox, Entity, Map, MapBuilder, Result, Tile, Tileset, Value,
};
use tracing::debug;

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSource {
    pub tile_id: u16,
    /// Frame duration in milliseconds
    pub duration: f64,
}

/// A rectangle drawn on a tile, grouped by `kind` then `name`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionObjectSource {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSource {
    pub id: u16,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub animation: Vec<FrameSource>,
    #[serde(default)]
    pub objects: Vec<CollisionObjectSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetSource {
    /// Path of the tileset image; its file stem becomes the source name
    pub image: String,
    /// Pixel height of the image, checked against the tile geometry
    #[serde(default)]
    pub image_height: Option<u32>,
    pub tile_width: u16,
    pub tile_height: u16,
    pub tile_count: u16,
    #[serde(default)]
    pub columns: u16,
    #[serde(default)]
    pub margin: u16,
    #[serde(default)]
    pub spacing: u16,
    /// Pure collision tileset
    #[serde(default)]
    pub bounds: bool,
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub tiles: Vec<TileSource>,
}

impl TilesetSource {
    pub fn into_tileset(self) -> Result<Tileset> {
        let mut tileset = Tileset::new(
            Tileset::source_from_path(&self.image),
            self.tile_width,
            self.tile_height,
            self.tile_count,
        )
        .with_layout(self.margin, self.spacing, self.columns)
        .with_bounds(self.bounds)
        .with_library(self.library);
        if let Some(height) = self.image_height {
            let (width, packed_height) = tileset.packed_image_size(height)?;
            debug!(source = %tileset.source, width, packed_height, "tileset geometry");
        }

        for source in self.tiles {
            let mut tile = Tile::new()
                .with_name(source.name.as_deref().map(symbol_hash).unwrap_or_default())
                .with_library(source.library);
            for frame in &source.animation {
                tile = tile.with_frame(frame.tile_id, ms_to_ticks(frame.duration));
            }
            for object in &source.objects {
                let collision_box =
                    CollisionBox::from_editor(object.x, object.y, object.width, object.height);
                tile.add_collision_object(
                    object.kind.as_deref().map(symbol_hash),
                    symbol_hash(&object.name),
                    collision_box,
                )?;
            }
            tileset.tiles.insert(source.id, tile);
        }
        Ok(tileset)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySource {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetRef {
    pub first_gid: u32,
    pub tileset: TilesetSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSource {
    pub name: String,
    #[serde(default = "one")]
    pub parallax_x: f64,
    #[serde(default = "one")]
    pub parallax_y: f64,
    /// Global tile ids in row-major order, 0 for empty cells
    pub data: Vec<u32>,
}

/// A placed object; `gid` optionally carries a tile with flip bits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSource {
    pub layer: String,
    pub x: u16,
    pub y: u16,
    #[serde(default)]
    pub gid: u32,
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub state: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSource {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    #[serde(default)]
    pub properties: Vec<PropertySource>,
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
    #[serde(default)]
    pub layers: Vec<LayerSource>,
    #[serde(default)]
    pub objects: Vec<ObjectSource>,
}

impl MapSource {
    pub fn into_map(self) -> Result<Map> {
        let mut builder = MapBuilder::new(self.x, self.y, self.width, self.height);
        for reference in self.tilesets {
            builder.add_tileset(reference.first_gid, reference.tileset.into_tileset()?);
        }
        for property in &self.properties {
            builder.add_property(&property.name, &property.value)?;
        }
        for layer in &self.layers {
            builder.add_layer(&layer.name, (layer.parallax_x, layer.parallax_y), &layer.data)?;
        }
        for object in self.objects {
            let state = match &object.state {
                Some(value) => value.state_word("state")?,
                None => 0,
            };
            let mut entity =
                Entity::new(symbol_hash(&object.layer), object.x, object.y).with_state(state);
            entity.entity_type = object.entity_type;
            builder.add_entity(entity, object.gid)?;
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSource {
    #[serde(default)]
    pub maps: Vec<MapSource>,
}

impl WorldSource {
    pub fn into_maps(self) -> Result<Vec<Map>> {
        self.maps.into_iter().map(MapSource::into_map).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tilebin_core::{CoreError, LayerKind, FLIP_X};

    fn tileset_json() -> serde_json::Value {
        json!({
            "image": "art/cave.png",
            "image_height": 36,
            "tile_width": 16,
            "tile_height": 16,
            "tile_count": 8,
            "columns": 4,
            "margin": 1,
            "spacing": 2,
            "library": "cave_lib",
            "tiles": [{
                "id": 2,
                "name": "spike",
                "animation": [{ "tile_id": 2, "duration": 100.0 }, { "tile_id": 3, "duration": 250.0 }],
                "objects": [{ "kind": "hit", "name": "body", "x": 0.4, "y": 8.0, "width": 16.0, "height": 7.6 }]
            }]
        })
    }

    #[test]
    fn test_tileset_source() {
        let source: TilesetSource = serde_json::from_value(tileset_json()).unwrap();
        let tileset = source.into_tileset().unwrap();
        assert_eq!(tileset.source, "cave");
        assert_eq!(tileset.library, "cave_lib");
        let tile = &tileset.tiles[&2];
        assert_eq!(tile.name, symbol_hash("spike"));
        assert_eq!(tile.animation[0].duration, 6);
        assert_eq!(tile.animation[1].duration, 15);
        let boxes = &tile.collision_boxes[&symbol_hash("hit")][&symbol_hash("body")];
        assert_eq!(boxes, &vec![CollisionBox::new(0, 8, 16, 8)]);
    }

    #[test]
    fn test_tileset_geometry_checked() {
        let mut value = tileset_json();
        value["image_height"] = json!(40);
        let source: TilesetSource = serde_json::from_value(value).unwrap();
        assert!(matches!(
            source.into_tileset(),
            Err(CoreError::TilesetGeometry { height: 40, .. })
        ));
    }

    #[test]
    fn test_collision_object_needs_kind() {
        let mut value = tileset_json();
        value["tiles"][0]["objects"][0]["kind"] = serde_json::Value::Null;
        let source: TilesetSource = serde_json::from_value(value).unwrap();
        assert_eq!(source.into_tileset(), Err(CoreError::MissingCollisionType));
    }

    #[test]
    fn test_map_source() {
        let source: MapSource = serde_json::from_value(json!({
            "x": 2, "y": -1, "width": 2, "height": 1,
            "properties": [{ "name": "dark", "value": true }],
            "tilesets": [
                { "first_gid": 1, "tileset": { "image": "cave.png", "tile_width": 16, "tile_height": 16, "tile_count": 8 } },
                { "first_gid": 9, "tileset": { "image": "bounds.png", "tile_width": 16, "tile_height": 16, "tile_count": 96, "bounds": true } }
            ],
            "layers": [
                { "name": "ground", "parallax_x": 0.5, "data": [1, 8] },
                { "name": "collision", "data": [41, 0] }
            ],
            "objects": [
                { "layer": "things", "x": 4, "y": 0, "gid": 2147483651u32, "type": "door", "state": 3 }
            ]
        }))
        .unwrap();
        let map = source.into_map().unwrap();

        assert_eq!(map.properties[0].value, 1);
        assert_eq!(map.layers[0].kind, LayerKind::Image);
        assert_eq!(map.layers[0].tiles, vec![1, 8]);
        assert_eq!(map.layers[1].kind, LayerKind::Bounds);
        assert_eq!(map.layers[1].tiles, vec![33, 0]);
        let entity = &map.entities[0];
        assert_eq!(entity.tile, 0x0803);
        assert_eq!(entity.state, 3);
        assert_eq!(entity.entity_type.as_deref(), Some("door"));
        assert_eq!(2147483651u32, FLIP_X | 3);
    }

    #[test]
    fn test_float_state_rejected() {
        let source: MapSource = serde_json::from_value(json!({
            "x": 0, "y": 0, "width": 1, "height": 1,
            "objects": [{ "layer": "things", "x": 0, "y": 0, "state": 1.5 }]
        }))
        .unwrap();
        assert!(matches!(
            source.into_map(),
            Err(CoreError::UnsupportedValue { kind: "float", .. })
        ));
    }
}
