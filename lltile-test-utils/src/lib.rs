//! Shared helpers for lltile tests and benches.
//!
//! Enable the `auto-init` feature in `dev-dependencies` to install the tracing
//! subscriber before any test runs.

use std::sync::{Arc, Once};

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use lltile_storage::{PhysicalBuffer, Tile, TileRef};
use lltile_types::TileId;

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let env = std::env::var("RUST_LOG").ok();
        let filter = match env {
            Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            None => EnvFilter::new("info"),
        };
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(feature = "auto-init")]
mod auto {
    // Use ctor to run at binary init time to avoid having to call init in every test.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}

/// Put any physical buffer behind a shared handle.
pub fn shared<B>(buffer: B) -> TileRef
where
    B: PhysicalBuffer + 'static,
{
    Arc::new(buffer)
}

/// Tile `id` with one nullable Int64 column per slice, named `c0`, `c1`, ...
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn int64_tile(id: TileId, columns: &[&[i64]]) -> TileRef {
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|values| Arc::new(Int64Array::from(values.to_vec())) as ArrayRef)
        .collect();
    build(id, DataType::Int64, arrays)
}

/// Tile `id` with one nullable Utf8 column per slice, named `c0`, `c1`, ...
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn utf8_tile(id: TileId, columns: &[&[&str]]) -> TileRef {
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|values| Arc::new(StringArray::from(values.to_vec())) as ArrayRef)
        .collect();
    build(id, DataType::Utf8, arrays)
}

fn build(id: TileId, data_type: DataType, arrays: Vec<ArrayRef>) -> TileRef {
    let fields: Vec<Field> = (0..arrays.len())
        .map(|i| Field::new(format!("c{i}"), data_type.clone(), true))
        .collect();
    let row_count = arrays.first().map_or(0, |array| array.len());
    let tile = Tile::try_new(id, Arc::new(Schema::new(fields)), arrays, row_count)
        .expect("fixture columns must have equal length");
    shared(tile)
}
