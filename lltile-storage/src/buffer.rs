use std::fmt::Debug;
use std::sync::{Arc, Weak};

use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use lltile_result::Result;
use lltile_types::{ColumnId, Row, RowId, TileId, Value};

/// Shared handle to a physical tile.
///
/// Whoever holds the last `TileRef` decides when the tile is released.
pub type TileRef = Arc<dyn PhysicalBuffer>;

/// Non-owning handle to a physical tile. Upgrading fails once every
/// [`TileRef`] has been dropped.
pub type WeakTileRef = Weak<dyn PhysicalBuffer>;

/// Identity of a live tile allocation.
///
/// Two handles share a key only when they point at the same tile. A
/// [`TileId`] is a label chosen by whoever built the tile and may repeat across
/// backends, so anything that deduplicates or groups tiles uses this instead.
pub type TileKey = usize;

/// Key of the tile behind `tile`. Stable for as long as any strong handle lives.
pub fn tile_key(tile: &TileRef) -> TileKey {
    Arc::as_ptr(tile).cast::<()>().addr()
}

/// Contract the execution core requires from physical storage.
///
/// A buffer has a fixed schema for its whole lifetime and is never mutated
/// through this trait, which is what makes read-only sharing between logical
/// tiles safe without locks.
///
/// Every accessor reports an out-of-range row or column as
/// [`lltile_result::Error::BoundsError`].
pub trait PhysicalBuffer: Debug + Send + Sync {
    /// Identity assigned when the tile was allocated.
    fn tile_id(&self) -> TileId;

    fn schema(&self) -> SchemaRef;

    fn num_rows(&self) -> usize;

    fn num_columns(&self) -> usize {
        self.schema().fields().len()
    }

    /// Value of one cell.
    fn value(&self, row: RowId, column: ColumnId) -> Result<Value>;

    /// Every cell of one row, in schema order.
    fn row(&self, row: RowId) -> Result<Row>;

    /// Whole column as an Arrow array, used for batched gathers.
    fn column(&self, column: ColumnId) -> Result<ArrayRef>;
}
