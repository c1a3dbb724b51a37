//! Flattening logical tiles back into physical tiles.
//!
//! Materialization is the only place the execution core copies row data. The
//! mapped columns are first grouped by the physical tile they come from; each
//! group then builds one gather index per position list it uses and runs
//! Arrow's `take` kernel once per column with it, so no per-row dispatch and no
//! per-column schema lookups happen in the copy loop. Only valid rows are
//! copied, in ascending logical row order.
//!
//! By default every output column is a fresh copy, so the output keeps no
//! source memory alive. [`MaterializeOptions::zero_copy_slices`] trades that
//! for speed on contiguous runs.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, UInt64Array};
use arrow::compute::{TakeOptions, take};
use arrow::datatypes::{FieldRef, Schema};
use lltile_plan::MaterializationPlan;
use lltile_result::{Error, Result};
use lltile_storage::{TileBackend, TileKey, TileRef, tile_key};
use lltile_types::{ColumnId, RowId};
use rustc_hash::FxHashMap;

use crate::logical_tile::LogicalTile;

/// Tuning knobs for [`materialize`].
#[derive(Clone, Copy, Debug)]
pub struct MaterializeOptions {
    /// When the valid rows of a position list map onto one contiguous,
    /// ascending run of physical rows, emit a slice of the source column
    /// instead of gathering.
    ///
    /// A slice shares the source tile's Arrow buffers, so the output then pins
    /// the whole source column in memory after the source tile is dropped.
    /// Off by default.
    pub zero_copy_slices: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            zero_copy_slices: false,
        }
    }
}

impl MaterializeOptions {
    /// Setting this variable to anything but `""`, `0` or `false` turns
    /// zero-copy slicing on.
    pub const ZERO_COPY_ENV: &'static str = "LLTILE_ZERO_COPY_SLICES";

    /// Defaults, adjusted by the process environment.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(Self::ZERO_COPY_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let mut options = Self::default();
        if let Some(value) = value {
            options.zero_copy_slices = !matches!(value.trim(), "" | "0" | "false");
        }
        options
    }
}

/// Mapped columns that all read from the same physical tile.
#[derive(Debug)]
pub(crate) struct TileGroup {
    pub(crate) tile: TileRef,
    /// `(old logical column id, new column id)`, ordered by old id.
    pub(crate) columns: Vec<(ColumnId, ColumnId)>,
}

/// Partition the plan's mapped columns by the physical tile backing them.
///
/// Groups appear in the order their first column appears (by ascending old
/// column id). Every tile is resolved here, so a released borrowed tile is
/// reported before any copying starts. Tiles are told apart by handle, never
/// by id.
pub(crate) fn group_columns_by_tile(
    source: &LogicalTile,
    plan: &MaterializationPlan,
) -> Result<Vec<TileGroup>> {
    let mut groups: Vec<TileGroup> = Vec::new();
    let mut group_of_tile: FxHashMap<TileKey, usize> = FxHashMap::default();

    for (old, new) in plan.sorted_pairs() {
        let tile = source.column(old)?.tile()?;
        let idx = match group_of_tile.get(&tile_key(&tile)) {
            Some(&idx) => idx,
            None => {
                group_of_tile.insert(tile_key(&tile), groups.len());
                groups.push(TileGroup {
                    tile,
                    columns: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[idx].columns.push((old, new));
    }
    Ok(groups)
}

/// How to pull the valid rows of one position list out of a source column.
enum Gather {
    Slice { offset: usize, len: usize },
    Take(UInt64Array),
}

impl Gather {
    fn plan(positions: &[RowId], valid_rows: &[RowId], options: MaterializeOptions) -> Self {
        let base_rows: Vec<u64> = valid_rows
            .iter()
            .map(|&row| positions[row] as u64)
            .collect();

        if options.zero_copy_slices
            && let Some(&start) = base_rows.first()
            && base_rows
                .iter()
                .enumerate()
                .all(|(i, &base)| base == start + i as u64)
        {
            return Gather::Slice {
                offset: start as usize,
                len: base_rows.len(),
            };
        }
        Gather::Take(UInt64Array::from(base_rows))
    }

    fn apply(&self, column: &ArrayRef) -> Result<ArrayRef> {
        match self {
            Gather::Slice { offset, len } => {
                if offset + len > column.len() {
                    return Err(Error::bounds("tile row", offset + len - 1, column.len()));
                }
                Ok(column.slice(*offset, *len))
            }
            Gather::Take(indices) => {
                let options = TakeOptions { check_bounds: true };
                Ok(take(column.as_ref(), indices, Some(options))?)
            }
        }
    }
}

/// Copy the valid rows of `source` into a new physical tile allocated from
/// `backend`, keeping only the columns named by `plan` and renumbering them.
///
/// The mapping is validated and every source tile resolved before anything is
/// copied, so a [`Error::MappingError`] or [`Error::TileReleased`] never leaves
/// a half-built tile behind. A source without valid rows yields an empty tile
/// with the mapped schema.
///
/// Unless `options.zero_copy_slices` is set, the returned tile holds its own
/// copy of the data and pins none of the source tiles' memory; the caller may
/// drop `source` and every tile it referenced.
pub fn materialize<B>(
    source: &LogicalTile,
    plan: &MaterializationPlan,
    backend: &B,
    options: MaterializeOptions,
) -> Result<TileRef>
where
    B: TileBackend + ?Sized,
{
    plan.validate(source.column_count())?;
    let groups = group_columns_by_tile(source, plan)?;

    let valid_rows: Vec<RowId> = source.iter().collect();
    let row_count = valid_rows.len();
    let column_count = plan.output_column_count();

    let mut fields: Vec<Option<FieldRef>> = vec![None; column_count];
    let mut columns: Vec<Option<ArrayRef>> = vec![None; column_count];

    for group in &groups {
        let tile_schema = group.tile.schema();
        let mut gathers: FxHashMap<usize, Gather> = FxHashMap::default();

        for &(old, new) in &group.columns {
            let pointer = source.column(old)?;
            let list_idx = pointer.position_list_idx();
            if !gathers.contains_key(&list_idx) {
                let positions = source.position_list(list_idx)?;
                gathers.insert(list_idx, Gather::plan(positions, &valid_rows, options));
            }
            let gather = gathers
                .get(&list_idx)
                .ok_or_else(|| Error::Internal("gather index missing".into()))?;

            let origin = pointer.origin_column_id();
            let column = group.tile.column(origin)?;
            columns[new] = Some(gather.apply(&column)?);
            fields[new] = Some(Arc::clone(&tile_schema.fields()[origin]));
            tracing::trace!(
                tile_id = group.tile.tile_id(),
                old_column = old,
                new_column = new,
                rows = row_count,
                "materialized column"
            );
        }
    }

    let fields = fields
        .into_iter()
        .enumerate()
        .map(|(idx, field)| {
            field.ok_or_else(|| Error::Internal(format!("output column {idx} has no source")))
        })
        .collect::<Result<Vec<_>>>()?;
    let columns = columns
        .into_iter()
        .enumerate()
        .map(|(idx, column)| {
            column.ok_or_else(|| Error::Internal(format!("output column {idx} was not copied")))
        })
        .collect::<Result<Vec<_>>>()?;

    let output = backend.allocate(Arc::new(Schema::new(fields)), columns, row_count)?;
    tracing::debug!(
        source_rows = source.row_count(),
        output_rows = row_count,
        output_columns = column_count,
        source_tiles = groups.len(),
        output_tile = output.tile_id(),
        "materialized logical tile"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lltile_test_utils::int64_tile;

    #[test]
    fn groups_follow_first_appearance() {
        let a = int64_tile(1, &[&[1], &[2]]);
        let b = int64_tile(2, &[&[3]]);
        let mut tile = LogicalTile::new();
        tile.add_position_list(vec![0]).unwrap();
        tile.add_column(&b, false, 0, 0).unwrap();
        tile.add_column(&a, false, 1, 0).unwrap();
        tile.add_column(&a, false, 0, 0).unwrap();

        let plan = MaterializationPlan::from_pairs([(0, 2), (1, 0), (2, 1)]);
        let groups = group_columns_by_tile(&tile, &plan).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].tile.tile_id(), 2);
        assert_eq!(groups[0].columns, vec![(0, 2)]);
        assert_eq!(groups[1].tile.tile_id(), 1);
        assert_eq!(groups[1].columns, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn distinct_tiles_sharing_an_id_get_separate_groups() {
        let a = int64_tile(1, &[&[10]]);
        let b = int64_tile(1, &[&[20]]);
        let mut tile = LogicalTile::new();
        tile.add_position_list(vec![0]).unwrap();
        tile.add_column(&a, false, 0, 0).unwrap();
        tile.add_column(&b, false, 0, 0).unwrap();

        let groups = group_columns_by_tile(&tile, &MaterializationPlan::identity(2)).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(Arc::ptr_eq(&groups[0].tile, &a));
        assert!(Arc::ptr_eq(&groups[1].tile, &b));
    }

    #[test]
    fn slicing_is_opt_in() {
        assert!(!MaterializeOptions::default().zero_copy_slices);
        assert!(!MaterializeOptions::from_env_value(None).zero_copy_slices);
        assert!(MaterializeOptions::from_env_value(Some("1")).zero_copy_slices);
        assert!(MaterializeOptions::from_env_value(Some("true")).zero_copy_slices);
        assert!(!MaterializeOptions::from_env_value(Some("0")).zero_copy_slices);
        assert!(!MaterializeOptions::from_env_value(Some("false")).zero_copy_slices);
    }

    #[test]
    fn contiguous_runs_become_slices() {
        let options = MaterializeOptions {
            zero_copy_slices: true,
        };
        assert!(matches!(
            Gather::plan(&[4, 5, 6, 9], &[0, 1, 2], options),
            Gather::Slice { offset: 4, len: 3 }
        ));
        assert!(matches!(
            Gather::plan(&[4, 5, 6, 9], &[0, 1, 3], options),
            Gather::Take(_)
        ));

        assert!(matches!(
            Gather::plan(&[4, 5, 6], &[0, 1, 2], MaterializeOptions::default()),
            Gather::Take(_)
        ));
    }

    #[test]
    fn empty_selection_gathers_nothing() {
        let gather = Gather::plan(&[3, 1], &[], MaterializeOptions::default());
        let column = int64_tile(1, &[&[7, 8, 9, 10]]).column(0).unwrap();
        assert_eq!(gather.apply(&column).unwrap().len(), 0);
    }
}
