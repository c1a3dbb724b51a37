//! lltile: logical tiles and late materialization over Arrow
//!
//! This crate is the entrypoint for the lltile execution core. It re-exports
//! the logical tile, the materializer, the executor protocol and the physical
//! storage types from the underlying `lltile-*` crates.
//!
//! # Quick Start
//!
//! Wrap a physical tile, hide a row, and flatten the rest into a new tile:
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use lltile::{LogicalTile, MaterializationPlan, MaterializeOptions, MemBackend, Tile, TileRef};
//!
//! let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Int64, false)]));
//! let column: ArrayRef = Arc::new(Int64Array::from(vec![1, 2, 3]));
//! let tile: TileRef = Arc::new(Tile::try_new(1, schema, vec![column], 3).unwrap());
//!
//! let mut view = LogicalTile::wrap_tile(tile, true).unwrap();
//! view.invalidate_row(1).unwrap();
//!
//! let backend = MemBackend::new();
//! let plan = MaterializationPlan::identity(1);
//! let out = lltile::materialize(&view, &plan, &backend, MaterializeOptions::default()).unwrap();
//! assert_eq!(out.num_rows(), 2);
//! ```
//!
//! # Architecture
//!
//! - **Execution** (`lltile-executor`): logical tiles, the materializer and
//!   pull-based executors.
//! - **Plans** (`lltile-plan`): materialization and order-by descriptions.
//! - **Storage** (`lltile-storage`): the physical tile contract, Arrow-backed
//!   tiles and allocation backends.
//! - **Types** (`lltile-types`, `lltile-result`): ids, values and errors.

pub use lltile_executor::{
    BoxedExecutor, ColumnPointer, LogicalTile, MaterializationExecutor, MaterializeOptions,
    PositionList, RowCursor, RowFilterExecutor, RowPredicate, TileExecutor, TileScanExecutor,
    collect_tiles, materialize,
};

pub use lltile_plan::{MaterializationPlan, OrderByPlan};

pub mod storage {
    //! Physical tiles and the backends that allocate them.

    pub use lltile_storage::{
        BackendStats, BackendStatsSnapshot, InstrumentedTile, MemBackend, PhysicalBuffer,
        ReadStats, ReadStatsSnapshot, Tile, TileBackend, TileKey, TileRef, WeakTileRef,
        tile_key,
    };
}

pub use storage::{MemBackend, PhysicalBuffer, Tile, TileBackend, TileRef};

// Re-export result types for error handling
pub use lltile_result::{Error, Result};

pub use lltile_types::{ColumnId, Row, RowId, TileId, Value};
