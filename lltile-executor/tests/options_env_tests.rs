//! Reads the process environment, so it lives in its own test binary with a
//! single test.

use lltile_executor::{LogicalTile, MaterializeOptions, materialize};
use lltile_plan::MaterializationPlan;
use lltile_storage::{MemBackend, PhysicalBuffer};
use lltile_test_utils::int64_tile;

#[test]
fn zero_copy_env_switch() {
    let var = MaterializeOptions::ZERO_COPY_ENV;
    let source = int64_tile(1, &[&[1, 2, 3]]);
    let view = LogicalTile::wrap_tile(source.clone(), false).unwrap();
    let plan = MaterializationPlan::identity(1);
    let backend = MemBackend::new();
    let shares_source = |options: MaterializeOptions| {
        let out = materialize(&view, &plan, &backend, options).unwrap();
        out.column(0).unwrap().to_data().buffers()[0].as_ptr()
            == source.column(0).unwrap().to_data().buffers()[0].as_ptr()
    };

    // SAFETY: this binary runs no other test, so nothing reads the environment
    // concurrently.
    unsafe { std::env::remove_var(var) };
    assert!(!MaterializeOptions::from_env().zero_copy_slices);
    assert!(!shares_source(MaterializeOptions::from_env()));

    unsafe { std::env::set_var(var, "1") };
    assert!(MaterializeOptions::from_env().zero_copy_slices);
    assert!(shares_source(MaterializeOptions::from_env()));

    unsafe { std::env::set_var(var, "false") };
    assert!(!MaterializeOptions::from_env().zero_copy_slices);

    unsafe { std::env::remove_var(var) };
}
