use std::sync::Arc;

use lltile_executor::{
    LogicalTile, MaterializationExecutor, RowFilterExecutor, TileExecutor, TileScanExecutor,
    collect_tiles,
};
use lltile_plan::MaterializationPlan;
use lltile_result::{Error, Result};
use lltile_storage::{MemBackend, TileBackend};
use lltile_test_utils::int64_tile;
use lltile_types::{RowId, Value};

fn int_at(tile: &LogicalTile, column: usize, row: RowId) -> Result<i64> {
    match tile.value(column, row)? {
        Some(Value::Int64(v)) => Ok(v),
        other => Err(Error::Internal(format!("unexpected value {other:?}"))),
    }
}

fn scan() -> TileScanExecutor {
    TileScanExecutor::owning([
        int64_tile(1, &[&[1, 2, 3, 4], &[10, 20, 30, 40]]),
        int64_tile(2, &[&[5, 7], &[50, 70]]),
        int64_tile(3, &[&[6, 8, 9], &[60, 80, 90]]),
    ])
}

#[test]
fn filter_invalidates_exactly_the_failing_rows() {
    let mut filter = RowFilterExecutor::new(Box::new(scan()), |tile, row| {
        Ok(int_at(tile, 0, row)? % 2 == 0)
    });
    let tiles = collect_tiles(&mut filter).unwrap();

    // Tile 2 has no even keys and is skipped.
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0].row_count(), 4);
    assert_eq!(tiles[0].iter().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(tiles[1].iter().collect::<Vec<_>>(), vec![0, 1]);
    assert!(tiles[1].owns_tile(3));
}

#[test]
fn filter_errors_propagate() {
    let mut filter = RowFilterExecutor::new(Box::new(scan()), |_, row| {
        if row == 1 {
            Err(Error::InvalidArgumentError("boom".into()))
        } else {
            Ok(true)
        }
    });
    assert!(filter.init());
    assert!(matches!(
        filter.next_tile(),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn materialization_after_filter_produces_dense_tiles() {
    let backend = Arc::new(MemBackend::new());
    let filter = RowFilterExecutor::new(Box::new(scan()), |tile, row| {
        Ok(int_at(tile, 0, row)? > 3)
    });
    let mut exec = MaterializationExecutor::new(
        Box::new(filter),
        MaterializationPlan::from_pairs([(1, 0)]),
        backend.clone(),
    );
    let tiles = collect_tiles(&mut exec).unwrap();

    let values: Vec<i64> = tiles
        .iter()
        .flat_map(|tile| {
            assert_eq!(tile.column_count(), 1);
            assert_eq!(tile.valid_row_count(), tile.row_count());
            assert_eq!(tile.owned_tile_count(), 1);
            tile.iter()
                .map(|row| int_at(tile, 0, row).unwrap())
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(values, vec![40, 50, 70, 60, 80, 90]);
    assert_eq!(backend.stats().tiles_allocated, 3);
}

#[test]
fn materialized_output_releases_source_tiles() {
    let source = int64_tile(11, &[&[1, 2, 3]]);
    let weak = Arc::downgrade(&source);
    let backend = Arc::new(MemBackend::new());
    let mut exec = MaterializationExecutor::new(
        Box::new(TileScanExecutor::owning([source])),
        MaterializationPlan::identity(1),
        backend,
    );
    assert!(exec.init());
    let out = exec.next_tile().unwrap().unwrap();

    assert!(weak.upgrade().is_none());
    assert!(!out.owns_tile(11));
    assert_eq!(out.value(0, 2).unwrap(), Some(Value::Int64(3)));
    assert!(exec.next_tile().unwrap().is_none());
}

#[test]
fn passthrough_plan_forwards_views() {
    let backend = Arc::new(MemBackend::new());
    let filter = RowFilterExecutor::new(Box::new(scan()), |_, row| Ok(row != 0));
    let mut exec = MaterializationExecutor::new(
        Box::new(filter),
        MaterializationPlan::passthrough(),
        backend.clone(),
    );
    let tiles = collect_tiles(&mut exec).unwrap();

    assert_eq!(tiles.len(), 3);
    assert!(tiles[0].owns_tile(1));
    assert_eq!(tiles[0].valid_row_count(), 3);
    assert!(!tiles[0].is_valid(0).unwrap());
    assert_eq!(backend.stats().tiles_allocated, 0);
}

#[test]
fn mapping_error_stops_the_pipeline() {
    let backend = Arc::new(MemBackend::new());
    let mut exec = MaterializationExecutor::new(
        Box::new(scan()),
        MaterializationPlan::from_pairs([(2, 0)]),
        backend.clone(),
    );
    assert!(matches!(collect_tiles(&mut exec), Err(Error::MappingError(_))));
    assert_eq!(backend.stats().tiles_allocated, 0);
}

struct BrokenExecutor;

impl TileExecutor for BrokenExecutor {
    fn init(&mut self) -> bool {
        false
    }

    fn next_tile(&mut self) -> Result<Option<LogicalTile>> {
        Err(Error::Internal("pulled after failed init".into()))
    }
}

#[test]
fn failed_init_propagates_to_parents() {
    let mut filter = RowFilterExecutor::new(Box::new(BrokenExecutor), |_, _| Ok(true));
    assert!(!filter.init());

    let mut exec = MaterializationExecutor::new(
        Box::new(BrokenExecutor),
        MaterializationPlan::identity(1),
        Arc::new(MemBackend::new()),
    );
    assert!(matches!(collect_tiles(&mut exec), Err(Error::Internal(_))));
}

#[test]
fn end_of_stream_is_not_an_error() {
    let mut empty = TileScanExecutor::borrowing(Vec::new());
    let tiles = collect_tiles(&mut empty).unwrap();
    assert!(tiles.is_empty());
}
