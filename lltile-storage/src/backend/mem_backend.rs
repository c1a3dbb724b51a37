use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::SchemaRef;
use lltile_result::{Error, Result};
use lltile_types::TileId;

use super::TileBackend;
use crate::buffer::TileRef;
use crate::tile::Tile;

/// Allocation counters shared by a backend and anyone inspecting it.
#[derive(Debug, Default)]
pub struct BackendStats {
    pub tiles_allocated: AtomicU64,
    pub rows_allocated: AtomicU64,
    pub cells_allocated: AtomicU64,
}

impl BackendStats {
    fn record(&self, rows: usize, columns: usize) {
        self.tiles_allocated.fetch_add(1, Ordering::Relaxed);
        self.rows_allocated.fetch_add(rows as u64, Ordering::Relaxed);
        self.cells_allocated
            .fetch_add((rows * columns) as u64, Ordering::Relaxed);
    }

    /// Capture a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> BackendStatsSnapshot {
        BackendStatsSnapshot {
            tiles_allocated: self.tiles_allocated.load(Ordering::Relaxed),
            rows_allocated: self.rows_allocated.load(Ordering::Relaxed),
            cells_allocated: self.cells_allocated.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.tiles_allocated.store(0, Ordering::Relaxed);
        self.rows_allocated.store(0, Ordering::Relaxed);
        self.cells_allocated.store(0, Ordering::Relaxed);
    }
}

/// Immutable copy of [`BackendStats`] captured at a specific moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendStatsSnapshot {
    pub tiles_allocated: u64,
    pub rows_allocated: u64,
    pub cells_allocated: u64,
}

impl BackendStatsSnapshot {
    /// Compute the delta between two snapshots (`newer - older`). Saturates at zero.
    pub fn delta_since(&self, older: &Self) -> Self {
        Self {
            tiles_allocated: self.tiles_allocated.saturating_sub(older.tiles_allocated),
            rows_allocated: self.rows_allocated.saturating_sub(older.rows_allocated),
            cells_allocated: self.cells_allocated.saturating_sub(older.cells_allocated),
        }
    }
}

/// Heap-backed tile allocator.
///
/// Tile ids start at 1 and increase monotonically within one backend. Two
/// backends hand out overlapping ids, as can hand-built tiles; ids label tiles
/// in errors and traces, while the handle itself ([`crate::tile_key`]) is what
/// identifies a tile.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct MemBackend {
    next_id: AtomicU64,
    stats: Arc<BackendStats>,
}

impl Default for MemBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            stats: Arc::new(BackendStats::default()),
        }
    }

    /// Handle to the live counters.
    pub fn stats_handle(&self) -> Arc<BackendStats> {
        Arc::clone(&self.stats)
    }

    fn next_tile_id(&self) -> Result<TileId> {
        self.next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                cur.checked_add(1)
            })
            .map_err(|_| Error::Internal("tile id space overflow".to_string()))
    }
}

impl TileBackend for MemBackend {
    fn allocate(
        &self,
        schema: SchemaRef,
        columns: Vec<ArrayRef>,
        row_count: usize,
    ) -> Result<TileRef> {
        if let Some(column) = columns.iter().find(|c| c.len() != row_count) {
            return Err(Error::Internal(format!(
                "allocation of {row_count} rows received a column of length {}",
                column.len()
            )));
        }

        let id = self.next_tile_id()?;
        let num_columns = columns.len();
        let tile = Tile::try_new(id, schema, columns, row_count)?;
        self.stats.record(row_count, num_columns);
        tracing::trace!(
            tile_id = id,
            rows = row_count,
            columns = num_columns,
            "allocated physical tile"
        );
        Ok(Arc::new(tile))
    }

    fn stats(&self) -> BackendStatsSnapshot {
        self.stats.snapshot()
    }
}
