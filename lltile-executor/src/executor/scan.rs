use std::collections::VecDeque;
use std::fmt;

use lltile_result::{Error, Result};
use lltile_storage::TileRef;

use super::TileExecutor;
use crate::logical_tile::LogicalTile;

/// Leaf executor: one logical tile per physical tile, in input order.
///
/// In borrowed mode the scan keeps every tile it has emitted alive for as long
/// as the scan itself lives, and the emitted views only borrow them. In owning
/// mode each emitted view takes the tile over and the scan lets go of it.
pub struct TileScanExecutor {
    pending: VecDeque<TileRef>,
    retained: Vec<TileRef>,
    take_ownership: bool,
    initialized: bool,
}

impl TileScanExecutor {
    /// Scan that hands ownership of each tile to the view it produces.
    pub fn owning(tiles: impl IntoIterator<Item = TileRef>) -> Self {
        Self::new(tiles, true)
    }

    /// Scan whose views borrow tiles kept alive by the scan.
    pub fn borrowing(tiles: impl IntoIterator<Item = TileRef>) -> Self {
        Self::new(tiles, false)
    }

    fn new(tiles: impl IntoIterator<Item = TileRef>, take_ownership: bool) -> Self {
        Self {
            pending: tiles.into_iter().collect(),
            retained: Vec::new(),
            take_ownership,
            initialized: false,
        }
    }

    /// Tiles not yet emitted.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl fmt::Debug for TileScanExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileScanExecutor")
            .field("pending", &self.pending.len())
            .field("retained", &self.retained.len())
            .field("take_ownership", &self.take_ownership)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl TileExecutor for TileScanExecutor {
    fn init(&mut self) -> bool {
        self.initialized = true;
        tracing::debug!(
            tiles = self.pending.len(),
            take_ownership = self.take_ownership,
            "tile scan initialized"
        );
        true
    }

    fn next_tile(&mut self) -> Result<Option<LogicalTile>> {
        if !self.initialized {
            return Err(Error::Internal("tile scan pulled before init".into()));
        }
        let Some(tile) = self.pending.pop_front() else {
            return Ok(None);
        };
        let logical = LogicalTile::wrap_tile(tile.clone(), self.take_ownership)?;
        if !self.take_ownership {
            self.retained.push(tile);
        }
        Ok(Some(logical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lltile_test_utils::int64_tile;

    #[test]
    fn owning_scan_transfers_tiles() {
        let mut scan = TileScanExecutor::owning([int64_tile(1, &[&[1, 2]]), int64_tile(2, &[&[3]])]);
        assert!(scan.init());
        let first = scan.next_tile().unwrap().unwrap();
        assert!(first.owns_tile(1));
        assert_eq!(first.row_count(), 2);
        let second = scan.next_tile().unwrap().unwrap();
        assert!(second.owns_tile(2));
        assert!(scan.next_tile().unwrap().is_none());
        assert!(scan.next_tile().unwrap().is_none());
    }

    #[test]
    fn pulling_before_init_is_an_error() {
        let mut scan = TileScanExecutor::owning([int64_tile(1, &[&[1]])]);
        assert!(matches!(scan.next_tile(), Err(Error::Internal(_))));
        assert_eq!(scan.remaining(), 1);
        assert!(scan.init());
        assert!(scan.next_tile().unwrap().is_some());
    }

    #[test]
    fn borrowing_scan_keeps_tiles_alive() {
        let mut scan = TileScanExecutor::borrowing([int64_tile(5, &[&[7]])]);
        assert!(scan.init());
        let view = scan.next_tile().unwrap().unwrap();
        assert!(!view.owns_tile(5));
        assert_eq!(
            view.value(0, 0).unwrap(),
            Some(lltile_types::Value::Int64(7))
        );
        assert_eq!(scan.remaining(), 0);
    }
}
