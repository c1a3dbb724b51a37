//! Physical storage for the lltile execution core.
//!
//! A physical tile is a fixed-schema block of rows with direct index access.
//! Everything above this crate talks to tiles through the [`PhysicalBuffer`]
//! trait and holds them behind reference-counted [`TileRef`] handles, so a
//! logical tile can borrow a tile without owning it and can never outlive it
//! silently.
//!
//! - [`buffer`]: the [`PhysicalBuffer`] contract and handle aliases
//! - [`tile`]: [`Tile`], the Arrow `RecordBatch` implementation
//! - [`backend`]: the [`TileBackend`] allocation trait and [`MemBackend`]
//! - [`instrumented`]: [`InstrumentedTile`], a read-counting wrapper
#![forbid(unsafe_code)]

pub mod backend;
pub mod buffer;
pub mod instrumented;
pub mod tile;

pub use backend::{BackendStats, BackendStatsSnapshot, MemBackend, TileBackend};
pub use buffer::{PhysicalBuffer, TileKey, TileRef, WeakTileRef, tile_key};
pub use instrumented::{InstrumentedTile, ReadStats, ReadStatsSnapshot};
pub use tile::Tile;
