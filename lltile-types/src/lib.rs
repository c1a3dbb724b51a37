//! Common types for the lltile workspace.
//!
//! - [`ids`]: tile, column and row identifiers
//! - [`value`]: the [`Value`] scalar read out of physical tiles, and [`Row`]
#![forbid(unsafe_code)]

pub mod ids;
pub mod value;

pub use ids::{ColumnId, RowId, TileId};
pub use value::{Row, Value};
