use std::fmt;

use lltile_result::Result;
use lltile_types::RowId;

use super::{BoxedExecutor, TileExecutor};
use crate::logical_tile::LogicalTile;

/// Row predicate evaluated against a logical tile. Returning `false` hides the
/// row.
pub type RowPredicate = Box<dyn FnMut(&LogicalTile, RowId) -> Result<bool> + Send>;

/// Hides the rows of each input tile that fail a predicate.
///
/// The filter is the only writer of its tiles' validity, and it makes a single
/// pass: conditions that need several checks belong in one predicate. Tiles
/// left without a valid row are skipped rather than emitted.
pub struct RowFilterExecutor {
    child: BoxedExecutor,
    predicate: RowPredicate,
}

impl RowFilterExecutor {
    pub fn new<F>(child: BoxedExecutor, predicate: F) -> Self
    where
        F: FnMut(&LogicalTile, RowId) -> Result<bool> + Send + 'static,
    {
        Self {
            child,
            predicate: Box::new(predicate),
        }
    }

    fn apply(&mut self, tile: &mut LogicalTile) -> Result<usize> {
        let candidates: Vec<RowId> = tile.iter().collect();
        let mut rejected = 0;
        for row in candidates {
            if !(self.predicate)(tile, row)? {
                tile.invalidate_row(row)?;
                rejected += 1;
            }
        }
        Ok(rejected)
    }
}

impl fmt::Debug for RowFilterExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFilterExecutor").finish_non_exhaustive()
    }
}

impl TileExecutor for RowFilterExecutor {
    fn init(&mut self) -> bool {
        if !self.child.init() {
            tracing::warn!("row filter child failed to initialize");
            return false;
        }
        true
    }

    fn next_tile(&mut self) -> Result<Option<LogicalTile>> {
        while let Some(mut tile) = self.child.next_tile()? {
            let rejected = self.apply(&mut tile)?;
            tracing::trace!(
                rows = tile.row_count(),
                rejected,
                remaining = tile.valid_row_count(),
                "row filter applied"
            );
            if tile.valid_row_count() > 0 {
                return Ok(Some(tile));
            }
        }
        Ok(None)
    }
}
