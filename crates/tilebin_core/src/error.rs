use thiserror::Error;

/// Errors raised while assembling in-memory maps and tilesets
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("tile {gid} matches no tileset declared by the map")]
    UnknownTile { gid: u32 },
    #[error("Image layer contains bounds tiles")]
    BoundsTileInImageLayer,
    #[error("Bounds layer contains image tiles")]
    ImageTileInBoundsLayer,
    #[error("a map references more than {max} {kind} tilesets")]
    TooManyTilesets { kind: &'static str, max: usize },
    #[error("tile {local} does not fit the 12-bit local tile index")]
    TileIndexOutOfRange { local: u32 },
    #[error("layer has {actual} tiles, expected {expected}")]
    LayerSize { expected: usize, actual: usize },
    #[error("parallax factor {0} cannot be expressed as an 8-bit fraction")]
    Parallax(f64),
    #[error("property {name} has unsupported value type {kind}")]
    UnsupportedValue { name: String, kind: &'static str },
    #[error("collision box missing type")]
    MissingCollisionType,
    #[error("Incorrect tileset geometry: image height {height} does not fit {tile_height}px tiles")]
    TilesetGeometry { height: u32, tile_height: u16 },
}
