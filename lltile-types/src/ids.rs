//! Identifiers shared across lltile crates.
//!
//! These live in `lltile-types` so plans, storage and executors agree on them
//! without depending on each other.

/// Label of a physical tile, assigned by the backend that allocated it.
///
/// Ids are reported in errors and diagnostics. They are only unique within one
/// backend, so they never decide whether two handles name the same tile.
pub type TileId = u64;

/// Column index. Logical column ids are positions in a logical tile's schema;
/// origin column ids are positions in a physical tile's schema.
pub type ColumnId = usize;

/// Row index. Logical row ids index a logical tile's position lists; base row
/// ids index a physical tile.
pub type RowId = usize;
