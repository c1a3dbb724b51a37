//! Allocation backends for physical tiles.
//!
//! Operators that produce new physical data (the materializer, mostly) never
//! construct tiles directly; they hand finished columns to a [`TileBackend`],
//! which assigns the tile id and decides where the memory lives.

use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use lltile_result::Result;

use crate::buffer::TileRef;

pub mod mem_backend;
pub use mem_backend::*;

pub trait TileBackend: Send + Sync + 'static {
    /// Allocate a tile holding `columns` under `schema`.
    ///
    /// `row_count` must match the length of every column; it is what gives a
    /// zero-column tile its row count.
    fn allocate(
        &self,
        schema: SchemaRef,
        columns: Vec<ArrayRef>,
        row_count: usize,
    ) -> Result<TileRef>;

    /// Allocation counters. Backends without accounting return zeros.
    fn stats(&self) -> BackendStatsSnapshot {
        BackendStatsSnapshot::default()
    }
}
