#![forbid(unsafe_code)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lltile_executor::{LogicalTile, MaterializeOptions, materialize};
use lltile_plan::MaterializationPlan;
use lltile_storage::{MemBackend, TileRef};
use lltile_test_utils::int64_tile;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const ROW_COUNT: usize = 65_536;
const COLUMN_COUNT: usize = 4;
const SEED: u64 = 0x9E37_79B9_F701_3CAB;

fn build_tile() -> TileRef {
    let columns: Vec<Vec<i64>> = (0..COLUMN_COUNT as i64)
        .map(|c| (0..ROW_COUNT as i64).map(|v| v.wrapping_mul(31) + c).collect())
        .collect();
    let slices: Vec<&[i64]> = columns.iter().map(Vec::as_slice).collect();
    int64_tile(1, &slices)
}

/// Identity view with roughly `invalid_ratio` of its rows invalidated.
fn build_view(tile: &TileRef, invalid_ratio: f64, rng: &mut StdRng) -> LogicalTile {
    let mut view = LogicalTile::wrap_tile(tile.clone(), false).expect("wrap tile");
    for row in 0..ROW_COUNT {
        if rng.random_bool(invalid_ratio) {
            view.invalidate_row(row).expect("invalidate");
        }
    }
    view
}

/// View whose single position list visits the tile in shuffled order.
fn build_shuffled_view(tile: &TileRef, rng: &mut StdRng) -> LogicalTile {
    let mut positions: Vec<usize> = (0..ROW_COUNT).collect();
    positions.shuffle(rng);
    let mut view = LogicalTile::new();
    let list = view.add_position_list(positions).expect("position list");
    for column in 0..COLUMN_COUNT {
        view.add_column(tile, false, column, list).expect("add column");
    }
    view
}

fn bench_materialize(c: &mut Criterion) {
    let tile = build_tile();
    let mut rng = StdRng::seed_from_u64(SEED);
    let backend = MemBackend::new();
    let plan = MaterializationPlan::identity(COLUMN_COUNT);
    let mut group = c.benchmark_group("materialize");

    for ratio in [0.0, 0.1, 0.5, 0.9] {
        let view = build_view(&tile, ratio, &mut rng);
        group.bench_with_input(BenchmarkId::new("invalid_ratio", ratio), &view, |b, view| {
            b.iter(|| {
                let out = materialize(view, &plan, &backend, MaterializeOptions::default())
                    .expect("materialize");
                black_box(out);
            });
        });
    }

    let dense = build_view(&tile, 0.0, &mut rng);
    group.bench_function("dense_with_slices", |b| {
        let options = MaterializeOptions {
            zero_copy_slices: true,
        };
        b.iter(|| {
            let out = materialize(&dense, &plan, &backend, options).expect("materialize");
            black_box(out);
        });
    });

    let shuffled = build_shuffled_view(&tile, &mut rng);
    group.bench_function("shuffled_positions", |b| {
        b.iter(|| {
            let out = materialize(&shuffled, &plan, &backend, MaterializeOptions::default())
                .expect("materialize");
            black_box(out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_materialize);
criterion_main!(benches);
