//! Tile execution core.
//!
//! Operators in this crate pass [`LogicalTile`]s to each other instead of
//! copying rows. A logical tile points into one or more immutable physical
//! tiles through position lists and hides filtered rows with a validity
//! bitmap. Data is only copied when a [`MaterializationExecutor`] (or a direct
//! call to [`materialize`]) flattens a logical tile into a new physical tile.
//!
//! - [`logical_tile`]: [`LogicalTile`], [`ColumnPointer`] and [`RowCursor`]
//! - [`materialize`]: gathering valid rows into a fresh tile
//! - [`executor`]: the pull-based [`TileExecutor`] protocol and its scan,
//!   filter and materialization implementations
#![forbid(unsafe_code)]

pub mod executor;
pub mod logical_tile;
mod materialize;

pub use executor::{
    BoxedExecutor, MaterializationExecutor, RowFilterExecutor, RowPredicate, TileExecutor,
    TileScanExecutor, collect_tiles,
};
pub use logical_tile::{ColumnPointer, LogicalTile, PositionList, RowCursor};
pub use materialize::{MaterializeOptions, materialize};
