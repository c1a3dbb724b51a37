//! Pull-based executors that stream logical tiles.
//!
//! An executor is initialized once and then drained by repeated calls to
//! [`TileExecutor::next_tile`]. `Ok(None)` marks the end of the stream and is
//! never an error; a child that runs dry simply makes its parent run dry.

pub mod filter;
pub mod materialization;
pub mod scan;

use lltile_result::{Error, Result};

use crate::logical_tile::LogicalTile;

pub use filter::{RowFilterExecutor, RowPredicate};
pub use materialization::MaterializationExecutor;
pub use scan::TileScanExecutor;

/// Boxed child executor.
pub type BoxedExecutor = Box<dyn TileExecutor>;

pub trait TileExecutor: Send {
    /// Prepare the executor and its children. `false` means setup failed and
    /// the executor must not be pulled.
    fn init(&mut self) -> bool;

    /// Next logical tile, or `Ok(None)` once the stream is exhausted.
    fn next_tile(&mut self) -> Result<Option<LogicalTile>>;
}

impl<E> TileExecutor for Box<E>
where
    E: TileExecutor + ?Sized,
{
    fn init(&mut self) -> bool {
        (**self).init()
    }

    fn next_tile(&mut self) -> Result<Option<LogicalTile>> {
        (**self).next_tile()
    }
}

/// Initialize `executor` and drain it.
pub fn collect_tiles<E>(executor: &mut E) -> Result<Vec<LogicalTile>>
where
    E: TileExecutor + ?Sized,
{
    if !executor.init() {
        return Err(Error::Internal("executor failed to initialize".into()));
    }
    let mut tiles = Vec::new();
    while let Some(tile) = executor.next_tile()? {
        tiles.push(tile);
    }
    tracing::debug!(tiles = tiles.len(), "executor drained");
    Ok(tiles)
}
