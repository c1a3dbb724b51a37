//! Plan node descriptions consumed by executors.

use lltile_result::Error;
use lltile_types::ColumnId;
use rustc_hash::{FxHashMap, FxHashSet};

/// Result type for plan operations.
pub type PlanResult<T> = lltile_result::Result<T>;

// ============================================================================
// Materialization
// ============================================================================

/// Describes how a materialization executor should reshape its input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterializationPlan {
    /// Old logical column id in the input tile → column id in the output tile.
    /// Input columns without an entry are dropped.
    pub old_to_new_cols: FxHashMap<ColumnId, ColumnId>,
    /// When false, input tiles are passed through with their indirection intact.
    pub physify: bool,
}

impl MaterializationPlan {
    pub fn new(old_to_new_cols: FxHashMap<ColumnId, ColumnId>) -> Self {
        Self {
            old_to_new_cols,
            physify: true,
        }
    }

    /// Keep the first `column_count` columns in their current order.
    pub fn identity(column_count: usize) -> Self {
        Self::new((0..column_count).map(|id| (id, id)).collect())
    }

    /// Build a plan from `(old, new)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ColumnId, ColumnId)>,
    {
        Self::new(pairs.into_iter().collect())
    }

    /// A plan that forwards input tiles untouched.
    pub fn passthrough() -> Self {
        Self {
            old_to_new_cols: FxHashMap::default(),
            physify: false,
        }
    }

    pub fn output_column_count(&self) -> usize {
        self.old_to_new_cols.len()
    }

    /// `(old, new)` pairs ordered by old column id.
    pub fn sorted_pairs(&self) -> Vec<(ColumnId, ColumnId)> {
        let mut pairs: Vec<_> = self
            .old_to_new_cols
            .iter()
            .map(|(&old, &new)| (old, new))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Check the mapping against an input with `input_column_count` columns.
    ///
    /// Every old id must exist in the input, and the new ids must be exactly
    /// `0..output_column_count()` so the output schema has no holes.
    pub fn validate(&self, input_column_count: usize) -> PlanResult<()> {
        let mut seen = FxHashSet::default();
        for (old, new) in self.sorted_pairs() {
            if old >= input_column_count {
                return Err(Error::mapping(format!(
                    "column {old} is not in the source schema ({input_column_count} columns)"
                )));
            }
            if new >= self.output_column_count() {
                return Err(Error::mapping(format!(
                    "output column {new} leaves a gap in an output of {} columns",
                    self.output_column_count()
                )));
            }
            if !seen.insert(new) {
                return Err(Error::mapping(format!(
                    "output column {new} is mapped more than once"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Order By
// ============================================================================

/// Sort metadata for an order-by consumer of logical tiles.
///
/// Keys are logical column ids of the input tiles, primary key first. The sort
/// itself compares values read through the logical tile, so this plan carries
/// nothing physical.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderByPlan {
    sort_keys: Vec<ColumnId>,
    descend_flags: Vec<bool>,
    /// Projected output columns. Empty means the input schema is kept as is.
    output_column_ids: Vec<ColumnId>,
}

impl OrderByPlan {
    pub fn try_new(
        sort_keys: Vec<ColumnId>,
        descend_flags: Vec<bool>,
        output_column_ids: Vec<ColumnId>,
    ) -> PlanResult<Self> {
        if sort_keys.len() != descend_flags.len() {
            return Err(Error::InvalidArgumentError(format!(
                "{} sort keys but {} descend flags",
                sort_keys.len(),
                descend_flags.len()
            )));
        }
        Ok(Self {
            sort_keys,
            descend_flags,
            output_column_ids,
        })
    }

    pub fn sort_keys(&self) -> &[ColumnId] {
        &self.sort_keys
    }

    pub fn descend_flags(&self) -> &[bool] {
        &self.descend_flags
    }

    pub fn output_column_ids(&self) -> &[ColumnId] {
        &self.output_column_ids
    }

    /// `(column_id, descending)` per key, primary key first.
    pub fn sort_specs(&self) -> impl Iterator<Item = (ColumnId, bool)> + '_ {
        self.sort_keys
            .iter()
            .copied()
            .zip(self.descend_flags.iter().copied())
    }

    /// Ensure every referenced column exists in an input of `column_count` columns.
    pub fn validate_for(&self, column_count: usize) -> PlanResult<()> {
        let referenced = self.sort_keys.iter().chain(&self.output_column_ids);
        if let Some(&missing) = referenced.into_iter().find(|&&id| id >= column_count) {
            return Err(Error::schema(format!(
                "order by references column {missing} of an input with {column_count} columns"
            )));
        }
        Ok(())
    }
}
