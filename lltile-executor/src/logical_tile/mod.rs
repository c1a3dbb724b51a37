//! Logical tiles: lazy, indirected views over physical tiles.
//!
//! A [`LogicalTile`] never copies row data. Each logical column is a
//! [`ColumnPointer`] naming a physical tile, a column inside it and a position
//! list; the position list maps logical row ids to the physical tile's rows.
//! Filters hide rows by clearing a validity bit, so nothing is resized or
//! reordered until [`crate::materialize`] flattens the view into a new tile.
//!
//! # Ownership
//!
//! Pointers hold only weak handles. A tile added with `take_ownership` is also
//! kept in the view's owned set, so it lives exactly as long as the view (or
//! longer, if someone else holds a handle). The owned set is keyed by the tile
//! handle, not by [`TileId`]: distinct tiles that happen to share an id are
//! all kept. A borrowed tile must be kept alive
//! by its owner; reading through a pointer whose tile is gone yields
//! [`Error::TileReleased`] instead of touching freed memory.

use std::sync::Arc;

use arrow::array::BooleanBufferBuilder;
use lltile_result::{Error, Result};
use lltile_storage::{TileKey, TileRef, WeakTileRef, tile_key};
use lltile_types::{ColumnId, Row, RowId, TileId, Value};
use rustc_hash::FxHashMap;

mod display;
mod iter;

pub use iter::RowCursor;

/// Logical row id → base row id in a physical tile.
pub type PositionList = Vec<RowId>;

/// Where one logical column's values come from.
#[derive(Debug, Clone)]
pub struct ColumnPointer {
    tile: WeakTileRef,
    tile_id: TileId,
    origin_column_id: ColumnId,
    position_list_idx: usize,
}

impl ColumnPointer {
    pub fn tile_id(&self) -> TileId {
        self.tile_id
    }

    /// Column id inside the physical tile.
    pub fn origin_column_id(&self) -> ColumnId {
        self.origin_column_id
    }

    pub fn position_list_idx(&self) -> usize {
        self.position_list_idx
    }

    /// Resolve the physical tile this column reads from.
    pub fn tile(&self) -> Result<TileRef> {
        self.tile
            .upgrade()
            .ok_or(Error::TileReleased(self.tile_id))
    }
}

/// A lazy projection/selection over one or more physical tiles.
#[derive(Debug)]
pub struct LogicalTile {
    schema: Vec<ColumnPointer>,
    position_lists: Vec<PositionList>,
    row_count: usize,
    valid_rows: BooleanBufferBuilder,
    valid_count: usize,
    owned_tiles: FxHashMap<TileKey, TileRef>,
}

impl LogicalTile {
    pub fn new() -> Self {
        Self {
            schema: Vec::new(),
            position_lists: Vec::new(),
            row_count: 0,
            valid_rows: BooleanBufferBuilder::new(0),
            valid_count: 0,
            owned_tiles: FxHashMap::default(),
        }
    }

    /// Wrap a whole physical tile: one identity position list and one logical
    /// column per physical column, in order.
    pub fn wrap_tile(tile: TileRef, take_ownership: bool) -> Result<Self> {
        let mut logical = Self::new();
        let list_idx = logical.add_position_list((0..tile.num_rows()).collect())?;
        for column in 0..tile.num_columns() {
            logical.add_column(&tile, take_ownership, column, list_idx)?;
        }
        Ok(logical)
    }

    /// Add a position list and return its index.
    ///
    /// The first list fixes the row count and marks every row valid. Later lists
    /// must have the same length; a mismatch is a [`Error::SchemaError`] and
    /// leaves the tile unchanged.
    pub fn add_position_list(&mut self, list: PositionList) -> Result<usize> {
        if let Some(first) = self.position_lists.first()
            && first.len() != list.len()
        {
            return Err(Error::schema(format!(
                "position list of length {} does not match row count {}",
                list.len(),
                first.len()
            )));
        }

        if self.position_lists.is_empty() {
            self.row_count = list.len();
            self.valid_rows = BooleanBufferBuilder::new(list.len());
            self.valid_rows.append_n(list.len(), true);
            self.valid_count = list.len();
        }
        self.position_lists.push(list);
        Ok(self.position_lists.len() - 1)
    }

    /// Append a logical column reading `origin_column_id` of `tile` through
    /// position list `position_list_idx`. Returns the new logical column id.
    ///
    /// With `take_ownership` the view keeps `tile` alive until it is dropped.
    /// Taking ownership of a tile the view already owns is a no-op.
    pub fn add_column(
        &mut self,
        tile: &TileRef,
        take_ownership: bool,
        origin_column_id: ColumnId,
        position_list_idx: usize,
    ) -> Result<ColumnId> {
        if position_list_idx >= self.position_lists.len() {
            return Err(Error::schema(format!(
                "position list {position_list_idx} does not exist ({} lists)",
                self.position_lists.len()
            )));
        }
        if origin_column_id >= tile.num_columns() {
            return Err(Error::schema(format!(
                "tile {} has no column {origin_column_id} ({} columns)",
                tile.tile_id(),
                tile.num_columns()
            )));
        }

        let tile_id = tile.tile_id();
        self.schema.push(ColumnPointer {
            tile: Arc::downgrade(tile),
            tile_id,
            origin_column_id,
            position_list_idx,
        });
        if take_ownership {
            self.owned_tiles
                .entry(tile_key(tile))
                .or_insert_with(|| Arc::clone(tile));
        }
        Ok(self.schema.len() - 1)
    }

    /// Value at `(column_id, row_id)`.
    ///
    /// `Ok(None)` means the row was invalidated; the physical tile is not read.
    pub fn value(&self, column_id: ColumnId, row_id: RowId) -> Result<Option<Value>> {
        let pointer = self.column(column_id)?;
        if !self.is_valid(row_id)? {
            return Ok(None);
        }
        let base_row = self.position_lists[pointer.position_list_idx][row_id];
        pointer
            .tile()?
            .value(base_row, pointer.origin_column_id)
            .map(Some)
    }

    /// The full physical row behind `(column_id, row_id)`.
    ///
    /// The row comes from the single tile that backs `column_id`. Other logical
    /// columns of the same row may live in different tiles; use the
    /// materializer to assemble rows across tiles.
    pub fn row(&self, column_id: ColumnId, row_id: RowId) -> Result<Option<Row>> {
        let pointer = self.column(column_id)?;
        if !self.is_valid(row_id)? {
            return Ok(None);
        }
        let base_row = self.position_lists[pointer.position_list_idx][row_id];
        pointer.tile()?.row(base_row).map(Some)
    }

    /// Hide a row from every accessor, iterator and materialization.
    ///
    /// Position lists and schema are untouched. Invalidating an already
    /// invalid row is a no-op.
    pub fn invalidate_row(&mut self, row_id: RowId) -> Result<()> {
        if self.is_valid(row_id)? {
            self.valid_rows.set_bit(row_id, false);
            self.valid_count -= 1;
        }
        Ok(())
    }

    pub fn is_valid(&self, row_id: RowId) -> Result<bool> {
        if row_id >= self.row_count {
            return Err(Error::bounds("row", row_id, self.row_count));
        }
        Ok(self.valid_rows.get_bit(row_id))
    }

    /// Number of logical rows, valid or not.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Number of rows that are still visible.
    pub fn valid_row_count(&self) -> usize {
        self.valid_count
    }

    pub fn column(&self, column_id: ColumnId) -> Result<&ColumnPointer> {
        self.schema
            .get(column_id)
            .ok_or_else(|| Error::bounds("column", column_id, self.schema.len()))
    }

    pub fn columns(&self) -> &[ColumnPointer] {
        &self.schema
    }

    /// Physical tile backing `column_id`.
    pub fn base_tile(&self, column_id: ColumnId) -> Result<TileRef> {
        self.column(column_id)?.tile()
    }

    pub fn position_list(&self, idx: usize) -> Result<&PositionList> {
        self.position_lists
            .get(idx)
            .ok_or_else(|| Error::bounds("position list", idx, self.position_lists.len()))
    }

    pub fn position_list_count(&self) -> usize {
        self.position_lists.len()
    }

    /// Whether this view keeps `tile` alive.
    pub fn owns(&self, tile: &TileRef) -> bool {
        self.owned_tiles.contains_key(&tile_key(tile))
    }

    /// Whether this view keeps some tile labelled `tile_id` alive.
    pub fn owns_tile(&self, tile_id: TileId) -> bool {
        self.owned_tiles.values().any(|tile| tile.tile_id() == tile_id)
    }

    pub fn owned_tile_count(&self) -> usize {
        self.owned_tiles.len()
    }

    /// Cursor at the first valid row.
    pub fn begin(&self) -> RowCursor<'_> {
        RowCursor::begin(self)
    }

    /// Cursor past the last valid row.
    pub fn end(&self) -> RowCursor<'_> {
        RowCursor::end(self)
    }

    /// Valid row ids in ascending order. Restarts from row 0 on every call.
    pub fn iter(&self) -> RowCursor<'_> {
        self.begin()
    }

    /// First valid row at or after `start`.
    pub(crate) fn next_valid_from(&self, start: RowId) -> Option<RowId> {
        (start..self.row_count).find(|&row| self.valid_rows.get_bit(row))
    }

    pub(crate) fn valid_bit(&self, row_id: RowId) -> bool {
        self.valid_rows.get_bit(row_id)
    }

    pub(crate) fn position_lists(&self) -> &[PositionList] {
        &self.position_lists
    }

    pub(crate) fn owned_tile_ids(&self) -> Vec<TileId> {
        let mut ids: Vec<_> = self.owned_tiles.values().map(|tile| tile.tile_id()).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LogicalTile {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a LogicalTile {
    type Item = RowId;
    type IntoIter = RowCursor<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl Drop for LogicalTile {
    fn drop(&mut self) {
        if !self.owned_tiles.is_empty() {
            tracing::trace!(
                owned = self.owned_tiles.len(),
                "logical tile releasing owned physical tiles"
            );
        }
    }
}
