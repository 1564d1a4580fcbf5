//! The reflow driver.
//!
//! Orders work by dependencies, searches each work order's earliest valid
//! start, projects its end through the work-center calendar, and validates
//! the finished schedule.
//!
//! # Algorithm
//!
//! `ReflowEngine` places pinned maintenance orders first, then sweeps the
//! movable orders in topological dependency order, resolving work-center
//! conflicts greedily per order. It repairs feasibility only; it does not
//! optimize makespan or balance load.

mod conflict;
mod engine;

pub use conflict::CONFLICT_ITERATION_LIMIT;
pub use engine::ReflowEngine;

use crate::error::ReflowResult;
use crate::models::{ReflowOutcome, WorkCenter, WorkOrder};

/// Reflows `work_orders` onto `work_centers` with a default engine.
pub fn reflow(
    work_centers: &[WorkCenter],
    work_orders: &[WorkOrder],
) -> ReflowResult<ReflowOutcome> {
    ReflowEngine::new().reflow(work_centers, work_orders)
}
