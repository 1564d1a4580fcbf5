//! Schedule (result) model.
//!
//! A schedule maps each work center to its placed work orders in placement
//! order. A reflow also produces an audit trail of [`Change`] records and a
//! summary [`ReflowOutcome`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorkOrder;

/// Placed work orders grouped by work center.
///
/// The per-center vectors hold placement order (the order the engine placed
/// them), not a time sort. The map is ordered by center id so serialized
/// output is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    centers: BTreeMap<String, Vec<WorkOrder>>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a work order on its own work center.
    pub fn place(&mut self, order: WorkOrder) {
        self.centers
            .entry(order.work_center_id.clone())
            .or_default()
            .push(order);
    }

    /// Placed orders on one work center, in placement order.
    pub fn orders_for_center(&self, work_center_id: &str) -> &[WorkOrder] {
        self.centers
            .get(work_center_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over `(work_center_id, placed orders)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WorkOrder])> {
        self.centers
            .iter()
            .map(|(id, orders)| (id.as_str(), orders.as_slice()))
    }

    /// Iterates over every placed order.
    pub fn all_orders(&self) -> impl Iterator<Item = &WorkOrder> {
        self.centers.values().flatten()
    }

    /// Finds a placed order by id.
    pub fn find_order(&self, id: &str) -> Option<&WorkOrder> {
        self.all_orders().find(|o| o.id == id)
    }

    /// Total number of placed orders.
    pub fn order_count(&self) -> usize {
        self.centers.values().map(Vec::len).sum()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// An audit record for one rescheduled work order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Rescheduled work order id.
    pub work_order_id: String,
    /// Rescheduled work order number.
    pub work_order_number: String,
    /// Start before the reflow.
    pub old_start: DateTime<Utc>,
    /// End before the reflow.
    pub old_end: DateTime<Utc>,
    /// Start after the reflow.
    pub new_start: DateTime<Utc>,
    /// End after the reflow.
    pub new_end: DateTime<Utc>,
    /// How far the end slipped, in minutes (0 when it moved earlier).
    pub delay_minutes: i64,
    /// Why the order moved.
    pub reason: String,
}

impl Change {
    fn new(
        original: &WorkOrder,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            work_order_id: original.id.clone(),
            work_order_number: original.number.clone(),
            old_start: original.start,
            old_end: original.end,
            new_start,
            new_end,
            delay_minutes: (new_end - original.end).num_minutes().max(0),
            reason: reason.into(),
        }
    }

    /// Change caused by a dependency finishing after the original start.
    pub fn dependency_delay(
        original: &WorkOrder,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Self {
        Self::new(original, new_start, new_end, "Delayed by dependency")
    }

    /// Change caused by other orders occupying the work center.
    pub fn work_center_conflict(
        original: &WorkOrder,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Self {
        Self::new(original, new_start, new_end, "Work center conflict")
    }

    /// Change caused by the shift calendar or a maintenance window alone.
    pub fn calendar_constraint(
        original: &WorkOrder,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Self {
        Self::new(original, new_start, new_end, "Shift or maintenance constraint")
    }
}

/// The result of one reflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowOutcome {
    /// Whether the final schedule satisfies every constraint.
    pub success: bool,
    /// The recomputed schedule.
    pub updated_work_orders: Schedule,
    /// Audit trail of moved orders.
    pub changes: Vec<Change>,
    /// Human-readable summary.
    pub explanation: String,
    /// Constraint violations and structural problems, if any.
    pub errors: Vec<String>,
}

impl ReflowOutcome {
    /// A failed outcome with no schedule.
    pub fn failure(explanation: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            updated_work_orders: Schedule::new(),
            changes: Vec::new(),
            explanation: explanation.into(),
            errors,
        }
    }

    /// Total slip across all changes, in minutes.
    pub fn total_delay_minutes(&self) -> i64 {
        self.changes.iter().map(|c| c.delay_minutes).sum()
    }
}
