//! Plan descriptions for the tile execution core.
//!
//! Planning itself happens elsewhere. This crate only defines what a plan node
//! hands to the executors: the column mapping for materialization and the
//! sort-key metadata for order-by consumers.
#![forbid(unsafe_code)]

pub mod plans;

pub use plans::{MaterializationPlan, OrderByPlan, PlanResult};
