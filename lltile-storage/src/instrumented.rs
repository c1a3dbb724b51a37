use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use lltile_result::Result;
use lltile_types::{ColumnId, Row, RowId, TileId, Value};

use crate::buffer::{PhysicalBuffer, TileRef};

/// A thread-safe container for tile read statistics.
#[derive(Debug, Default)]
pub struct ReadStats {
    pub value_reads: AtomicU64,
    pub row_reads: AtomicU64,
    pub column_reads: AtomicU64,
}

impl ReadStats {
    /// Capture a point-in-time snapshot of the accumulated counters.
    pub fn snapshot(&self) -> ReadStatsSnapshot {
        ReadStatsSnapshot {
            value_reads: self.value_reads.load(Ordering::Relaxed),
            row_reads: self.row_reads.load(Ordering::Relaxed),
            column_reads: self.column_reads.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics to zero.
    pub fn reset(&self) {
        self.value_reads.store(0, Ordering::Relaxed);
        self.row_reads.store(0, Ordering::Relaxed);
        self.column_reads.store(0, Ordering::Relaxed);
    }
}

/// Immutable copy of [`ReadStats`] counters captured at a specific moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStatsSnapshot {
    pub value_reads: u64,
    pub row_reads: u64,
    pub column_reads: u64,
}

impl ReadStatsSnapshot {
    pub fn total(&self) -> u64 {
        self.value_reads + self.row_reads + self.column_reads
    }
}

/// A wrapper around any physical tile that counts every read made through it.
///
/// Reads are counted even when the inner tile rejects them, so a test can
/// assert that an accessor never reached storage at all.
#[derive(Debug)]
pub struct InstrumentedTile {
    inner: TileRef,
    stats: Arc<ReadStats>,
}

impl InstrumentedTile {
    /// Wraps a tile and returns the instrumented version along with a handle
    /// to its statistics.
    pub fn new(inner: TileRef) -> (Self, Arc<ReadStats>) {
        let stats = Arc::new(ReadStats::default());
        (
            Self {
                inner,
                stats: Arc::clone(&stats),
            },
            stats,
        )
    }

    pub fn inner(&self) -> &TileRef {
        &self.inner
    }
}

impl PhysicalBuffer for InstrumentedTile {
    fn tile_id(&self) -> TileId {
        self.inner.tile_id()
    }

    fn schema(&self) -> SchemaRef {
        self.inner.schema()
    }

    fn num_rows(&self) -> usize {
        self.inner.num_rows()
    }

    fn num_columns(&self) -> usize {
        self.inner.num_columns()
    }

    fn value(&self, row: RowId, column: ColumnId) -> Result<Value> {
        self.stats.value_reads.fetch_add(1, Ordering::Relaxed);
        self.inner.value(row, column)
    }

    fn row(&self, row: RowId) -> Result<Row> {
        self.stats.row_reads.fetch_add(1, Ordering::Relaxed);
        self.inner.row(row)
    }

    fn column(&self, column: ColumnId) -> Result<ArrayRef> {
        self.stats.column_reads.fetch_add(1, Ordering::Relaxed);
        self.inner.column(column)
    }
}
