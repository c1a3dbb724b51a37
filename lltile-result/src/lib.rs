//! Error types and result definitions for the lltile execution core.
//!
//! Every lltile crate reports failures through the single [`Error`] enum and the
//! [`Result<T>`] alias, so errors propagate across crate boundaries with `?`.
//!
//! # Error Categories
//!
//! - **Construction errors** ([`Error::SchemaError`]): a logical tile was assembled
//!   with mismatched position lists or dangling column references
//! - **Access errors** ([`Error::BoundsError`]): an accessor received a column or
//!   row id past the end of the tile
//! - **Materialization errors** ([`Error::MappingError`]): a column mapping names a
//!   column the source tile does not have
//! - **Lifetime errors** ([`Error::TileReleased`]): a borrowed tile was dropped
//!   while a logical tile still referenced it
//! - **Data format errors** ([`Error::Arrow`]): Arrow kernel failures
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states
//!
//! An invalidated row is *not* an error. Accessors report it as `Ok(None)`.
#![forbid(unsafe_code)]

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
