use std::fmt;
use std::sync::Arc;

use lltile_plan::MaterializationPlan;
use lltile_result::Result;
use lltile_storage::TileBackend;

use super::{BoxedExecutor, TileExecutor};
use crate::logical_tile::LogicalTile;
use crate::materialize::{MaterializeOptions, materialize};

/// Flattens every input tile into a new physical tile.
///
/// Each output view owns its tile and references nothing from the input, so
/// the input view (and any tiles only it kept alive) is released as soon as the
/// output exists. With `plan.physify == false` input views pass through
/// untouched.
pub struct MaterializationExecutor {
    child: BoxedExecutor,
    plan: MaterializationPlan,
    backend: Arc<dyn TileBackend>,
    options: MaterializeOptions,
}

impl MaterializationExecutor {
    pub fn new(
        child: BoxedExecutor,
        plan: MaterializationPlan,
        backend: Arc<dyn TileBackend>,
    ) -> Self {
        Self::with_options(child, plan, backend, MaterializeOptions::default())
    }

    pub fn with_options(
        child: BoxedExecutor,
        plan: MaterializationPlan,
        backend: Arc<dyn TileBackend>,
        options: MaterializeOptions,
    ) -> Self {
        Self {
            child,
            plan,
            backend,
            options,
        }
    }

    pub fn plan(&self) -> &MaterializationPlan {
        &self.plan
    }
}

impl fmt::Debug for MaterializationExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializationExecutor")
            .field("plan", &self.plan)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TileExecutor for MaterializationExecutor {
    fn init(&mut self) -> bool {
        if !self.child.init() {
            tracing::warn!("materialization child failed to initialize");
            return false;
        }
        tracing::debug!(
            physify = self.plan.physify,
            output_columns = self.plan.output_column_count(),
            "materialization executor initialized"
        );
        true
    }

    fn next_tile(&mut self) -> Result<Option<LogicalTile>> {
        let Some(source) = self.child.next_tile()? else {
            return Ok(None);
        };
        if !self.plan.physify {
            return Ok(Some(source));
        }

        let output = materialize(&source, &self.plan, self.backend.as_ref(), self.options)?;
        drop(source);
        LogicalTile::wrap_tile(output, true).map(Some)
    }
}
