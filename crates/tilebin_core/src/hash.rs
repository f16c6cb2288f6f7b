//! Symbolic name hashing

/// Hash a symbolic name (layer, property, tile, collision type, entity state)
/// into the fixed 32-bit key stored in compiled data.
///
/// This is CRC-32 (IEEE), so the runtime can hash the same strings and
/// compare keys without a string table.
pub fn symbol_hash(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}
