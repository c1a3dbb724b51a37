use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use lltile_types::RowId;

use super::LogicalTile;

/// Forward cursor over the valid row ids of a [`LogicalTile`], ascending.
///
/// A cursor is also an [`Iterator`]: `next` yields the current row id and
/// advances. The end position is `current() == None`, which no real row id can
/// collide with. Cursors compare equal only when they walk the same tile and
/// sit on the same row.
#[derive(Clone)]
pub struct RowCursor<'a> {
    tile: &'a LogicalTile,
    pos: Option<RowId>,
}

impl<'a> RowCursor<'a> {
    pub(crate) fn begin(tile: &'a LogicalTile) -> Self {
        Self {
            tile,
            pos: tile.next_valid_from(0),
        }
    }

    pub(crate) fn end(tile: &'a LogicalTile) -> Self {
        Self { tile, pos: None }
    }

    /// Logical row id under the cursor, or `None` at the end.
    pub fn current(&self) -> Option<RowId> {
        self.pos
    }

    pub fn is_end(&self) -> bool {
        self.pos.is_none()
    }

    /// Move to the next valid row. Advancing past the end stays at the end.
    pub fn advance(&mut self) {
        if let Some(pos) = self.pos {
            self.pos = self.tile.next_valid_from(pos + 1);
        }
    }
}

impl PartialEq for RowCursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tile, other.tile) && self.pos == other.pos
    }
}

impl Eq for RowCursor<'_> {}

impl fmt::Debug for RowCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowCursor")
            .field("tile", &ptr::from_ref(self.tile))
            .field("pos", &self.pos)
            .finish()
    }
}

impl Iterator for RowCursor<'_> {
    type Item = RowId;

    fn next(&mut self) -> Option<RowId> {
        let current = self.pos?;
        self.advance();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.pos {
            Some(pos) => (1, Some(self.tile.row_count() - pos)),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for RowCursor<'_> {}
