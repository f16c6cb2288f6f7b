//! Map header, layer and entity records

use crate::entity::{EntityPlan, SortOrders};
use crate::tileset::{read_tileset, write_tileset};
use std::collections::HashMap;
use tilebin_core::{Entity, Fraction, Layer, Map, Property, Tileset};
use tilebin_layout::{Cursor, Layout, OffsetQueue, Result};
use tracing::debug;

/// Layer record: name, parallax fractions, then the full tile grid
pub fn write_layer(layer: &Layer, out: &mut Layout<'_>) -> Result<usize> {
    let start = out.position();
    out.u32(layer.name)?;
    out.u8(layer.parallax_x.numerator)?;
    out.u8(layer.parallax_x.denominator)?;
    out.u8(layer.parallax_y.numerator)?;
    out.u8(layer.parallax_y.denominator)?;
    for &tile in &layer.tiles {
        out.u16(tile)?;
    }
    Ok(out.since(start))
}

pub fn write_entity(
    entity: &Entity,
    type_code: u16,
    indexed_id: u16,
    out: &mut Layout<'_>,
) -> Result<usize> {
    let start = out.position();
    out.u32(entity.layer_name)?;
    out.u16(entity.x)?;
    out.u16(entity.y)?;
    out.u16(entity.tile)?;
    out.u16(type_code)?;
    out.u16(indexed_id)?;
    out.u32(entity.state)?;
    Ok(out.since(start))
}

/// Write a map header followed by its image layers and tilesets.
///
/// An entity tileset with the same source as a map tileset is not written
/// a second time; its offset field points at the map tileset instead.
pub fn write_map(map: &Map, plan: &EntityPlan, out: &mut Layout<'_>) -> Result<usize> {
    let start = out.position();
    let mut map_tilesets = OffsetQueue::new("map tileset");
    let mut entity_tilesets = OffsetQueue::new("entity tileset");
    let mut layers = OffsetQueue::new("layer");

    out.i16(map.x)?;
    out.i16(map.y)?;
    out.u16(map.width)?;
    out.u16(map.height)?;
    out.count_u8("property_count", map.properties.len())?;
    for property in &map.properties {
        out.u32(property.name)?;
        out.u32(property.value)?;
    }
    out.count_u8("map_tileset_count", map.map_tilesets.len())?;
    for _ in &map.map_tilesets {
        out.reserve(&mut map_tilesets)?;
    }
    out.count_u8("entity_tileset_count", map.entity_tilesets.len())?;
    for _ in &map.entity_tilesets {
        out.reserve(&mut entity_tilesets)?;
    }
    let image_layers: Vec<&Layer> = map.image_layers().collect();
    out.count_u8("layer_count", image_layers.len())?;
    for _ in &image_layers {
        out.reserve(&mut layers)?;
    }

    out.count_u16("entity_count", map.entities.len())?;
    for (i, entity) in map.entities.iter().enumerate() {
        let type_code = plan.type_codes.get(i).copied().unwrap_or_default();
        let indexed_id = plan.indexed_ids.get(i).copied().unwrap_or_default();
        write_entity(entity, type_code, indexed_id, out)?;
    }
    write_sort_orders(&plan.orders, map.entities.len(), out)?;

    for layer in image_layers {
        layers.resolve_here(out)?;
        write_layer(layer, out)?;
    }

    let mut written: HashMap<&str, u32> = HashMap::new();
    for tileset in &map.map_tilesets {
        let offset = map_tilesets.resolve_here(out)?;
        written.entry(tileset.source.as_str()).or_insert(offset);
        write_tileset(tileset, out)?;
    }
    let mut shared = 0;
    for tileset in &map.entity_tilesets {
        match written.get(tileset.source.as_str()) {
            Some(&offset) => {
                entity_tilesets.resolve_with(out, offset)?;
                shared += 1;
            }
            None => {
                entity_tilesets.resolve_here(out)?;
                write_tileset(tileset, out)?;
            }
        }
    }

    map_tilesets.finish()?;
    entity_tilesets.finish()?;
    layers.finish()?;
    if !out.is_measuring() {
        debug!(
            x = map.x,
            y = map.y,
            bytes = out.since(start),
            shared_tilesets = shared,
            "wrote map"
        );
    }
    Ok(out.since(start))
}

fn write_sort_orders(orders: &SortOrders, count: usize, out: &mut Layout<'_>) -> Result<()> {
    for order in [&orders.x_min, &orders.x_max, &orders.y_min, &orders.y_max] {
        if order.len() != count {
            return Err(tilebin_layout::LayoutError::ValueOutOfRange {
                field: "sort_order",
                value: order.len(),
            });
        }
        for &index in order {
            out.u16(index)?;
        }
    }
    Ok(())
}

/// An entity record as stored in a compiled map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    pub layer_name: u32,
    pub x: u16,
    pub y: u16,
    pub tile: u16,
    pub type_code: u16,
    pub indexed_id: u16,
    pub state: u32,
}

/// A compiled map read back through its offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapView {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub properties: Vec<Property>,
    pub map_tileset_offsets: Vec<u32>,
    pub entity_tileset_offsets: Vec<u32>,
    pub layers: Vec<Layer>,
    pub entities: Vec<EntityRecord>,
    pub orders: SortOrders,
}

impl MapView {
    /// Tilesets referenced by the map's layers
    pub fn map_tilesets(&self, data: &[u8]) -> Result<Vec<Tileset>> {
        self.map_tileset_offsets.iter().map(|&offset| read_tileset(data, offset)).collect()
    }

    /// Tilesets referenced by the map's entities
    pub fn entity_tilesets(&self, data: &[u8]) -> Result<Vec<Tileset>> {
        self.entity_tileset_offsets.iter().map(|&offset| read_tileset(data, offset)).collect()
    }
}

pub fn read_map(data: &[u8], offset: u32) -> Result<MapView> {
    let mut cursor = Cursor::new(data).at(offset);
    let x = cursor.read_i16()?;
    let y = cursor.read_i16()?;
    let width = cursor.read_u16()?;
    let height = cursor.read_u16()?;

    let property_count = cursor.read_u8()?;
    let mut properties = Vec::with_capacity(usize::from(property_count));
    for _ in 0..property_count {
        let name = cursor.read_u32()?;
        let value = cursor.read_u32()?;
        properties.push(Property { name, value });
    }
    let count = usize::from(cursor.read_u8()?);
    let map_tileset_offsets = cursor.read_offsets(count)?;
    let count = usize::from(cursor.read_u8()?);
    let entity_tileset_offsets = cursor.read_offsets(count)?;
    let count = usize::from(cursor.read_u8()?);
    let layer_offsets = cursor.read_offsets(count)?;

    let entity_count = cursor.read_u16()?;
    let mut entities = Vec::with_capacity(usize::from(entity_count));
    for _ in 0..entity_count {
        entities.push(EntityRecord {
            layer_name: cursor.read_u32()?,
            x: cursor.read_u16()?,
            y: cursor.read_u16()?,
            tile: cursor.read_u16()?,
            type_code: cursor.read_u16()?,
            indexed_id: cursor.read_u16()?,
            state: cursor.read_u32()?,
        });
    }
    let mut read_order = || -> Result<Vec<u16>> {
        (0..entity_count).map(|_| cursor.read_u16()).collect()
    };
    let orders = SortOrders {
        x_min: read_order()?,
        x_max: read_order()?,
        y_min: read_order()?,
        y_max: read_order()?,
    };

    let cell_count = usize::from(width) * usize::from(height);
    let mut layers = Vec::with_capacity(layer_offsets.len());
    for layer_offset in layer_offsets {
        let mut record = Cursor::new(data).at(layer_offset);
        let name = record.read_u32()?;
        let parallax_x = Fraction::new(record.read_u8()?, record.read_u8()?);
        let parallax_y = Fraction::new(record.read_u8()?, record.read_u8()?);
        let tiles = (0..cell_count)
            .map(|_| record.read_u16())
            .collect::<Result<Vec<u16>>>()?;
        let mut layer = Layer::new(name, width, height).with_tiles(tiles);
        layer.parallax_x = parallax_x;
        layer.parallax_y = parallax_y;
        layers.push(layer);
    }

    Ok(MapView {
        x,
        y,
        width,
        height,
        properties,
        map_tileset_offsets,
        entity_tileset_offsets,
        layers,
        entities,
        orders,
    })
}
