//! The reflow engine.
//!
//! # Algorithm
//!
//! 1. Structural checks: empty input, duplicate ids, dependency cycles
//!    (soft failures), unknown work centers or dependency ids (fatal).
//! 2. Place maintenance-pinned orders verbatim; their times are
//!    authoritative, so movable work routes around them.
//! 3. Sweep the remaining orders in topological dependency order (ties
//!    broken by input position, so same-time collisions keep first-wins
//!    semantics). For each order: earliest start from its original start
//!    and every placed dependency end, snapped to working time, pushed
//!    past work-center conflicts, then projected through the calendar.
//! 4. Validate the finished schedule and summarize.
//!
//! # Complexity
//! O(n·(d + c·p)) where n=orders, d=dependencies/order, c=conflict rounds,
//! p=orders per work center.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::conflict::resolve_conflicts;
use crate::calendar::{next_available, project_end};
use crate::error::{ReflowError, ReflowResult};
use crate::models::{Change, ReflowOutcome, Schedule, WorkCenter, WorkOrder};
use crate::validation::{detect_cycles, find_duplicate_ids, validate_schedule};

/// Recomputes work-order placements against shifts, maintenance windows,
/// dependencies and work-center exclusivity.
///
/// Stateless; all mutable state lives inside one [`reflow`](Self::reflow)
/// call.
///
/// # Example
///
/// ```
/// use schedule_reflow::models::{WorkCenter, WorkOrder};
/// use schedule_reflow::reflow::ReflowEngine;
///
/// let centers = vec![WorkCenter::new("WC1").with_weekday_shifts(8, 16)];
/// let orders = vec![WorkOrder::new(
///     "A",
///     "WC1",
///     "2024-01-01T09:00:00Z".parse().unwrap(),
///     60,
/// )];
///
/// let outcome = ReflowEngine::new().reflow(&centers, &orders).unwrap();
/// assert!(outcome.success);
/// assert!(outcome.changes.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReflowEngine;

impl ReflowEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Reflows `work_orders` onto `work_centers`.
    ///
    /// Soft problems (empty input, duplicate ids, cycles, residual
    /// constraint violations) come back as an outcome with
    /// `success = false`; unresolvable references and exhausted iteration
    /// bounds are `Err`.
    pub fn reflow(
        &self,
        work_centers: &[WorkCenter],
        work_orders: &[WorkOrder],
    ) -> ReflowResult<ReflowOutcome> {
        info!(
            work_centers = work_centers.len(),
            work_orders = work_orders.len(),
            "starting reflow"
        );

        if work_orders.is_empty() {
            return Ok(ReflowOutcome::failure("No work orders to reflow", Vec::new()));
        }

        let duplicates = find_duplicate_ids(work_orders);
        if !duplicates.is_empty() {
            let messages: Vec<String> = duplicates.into_iter().map(|e| e.message).collect();
            return Ok(ReflowOutcome::failure(messages.join("; "), messages));
        }

        let cycles = detect_cycles(work_orders);
        if !cycles.is_empty() {
            let messages: Vec<String> = cycles.into_iter().map(|e| e.message).collect();
            return Ok(ReflowOutcome::failure(messages.join("; "), messages));
        }

        let centers: HashMap<&str, &WorkCenter> =
            work_centers.iter().map(|c| (c.id.as_str(), c)).collect();
        let known_ids: HashSet<&str> = work_orders.iter().map(|o| o.id.as_str()).collect();
        for order in work_orders {
            if !centers.contains_key(order.work_center_id.as_str()) {
                return Err(ReflowError::UnknownWorkCenter {
                    work_order: order.id.clone(),
                    work_center: order.work_center_id.clone(),
                });
            }
            for dep in &order.depends_on {
                if !known_ids.contains(dep.as_str()) {
                    return Err(ReflowError::UnknownDependency {
                        work_order: order.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let mut schedule = Schedule::new();
        let mut placed_ends: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut changes: Vec<Change> = Vec::new();

        // Pinned orders first, untouched.
        for order in work_orders.iter().filter(|o| o.is_maintenance) {
            debug!(work_order = %order.id, start = %order.start, "placing pinned order");
            placed_ends.insert(order.id.clone(), order.end);
            schedule.place(order.clone());
        }

        for index in dependency_order(work_orders) {
            let order = &work_orders[index];
            let Some(&center) = centers.get(order.work_center_id.as_str()) else {
                return Err(ReflowError::UnknownWorkCenter {
                    work_order: order.id.clone(),
                    work_center: order.work_center_id.clone(),
                });
            };

            // Dependency ends are consulted across every work center.
            let mut earliest = order.start;
            for dep in &order.depends_on {
                if let Some(end) = placed_ends.get(dep) {
                    earliest = earliest.max(*end);
                }
            }

            let snapped = next_available(earliest, center)?;
            let new_start = resolve_conflicts(
                order,
                snapped,
                schedule.orders_for_center(&order.work_center_id),
                center,
            )?;
            let new_end = project_end(new_start, order.duration_minutes, center)?;

            if new_start != order.start || new_end != order.end {
                debug!(
                    work_order = %order.id,
                    old_start = %order.start,
                    new_start = %new_start,
                    new_end = %new_end,
                    "rescheduled"
                );
                changes.push(self.classify_change(
                    order,
                    new_start,
                    new_end,
                    work_orders,
                    &placed_ends,
                ));
            }

            let mut placed = order.clone();
            placed.reschedule(new_start, new_end);
            placed_ends.insert(placed.id.clone(), new_end);
            schedule.place(placed);
        }

        let outcome = match validate_schedule(&schedule, work_centers) {
            Ok(()) => {
                let explanation = if changes.is_empty() {
                    "No changes required".to_string()
                } else {
                    let total: i64 = changes.iter().map(|c| c.delay_minutes).sum();
                    format!(
                        "Rescheduled {} work order(s) with total delay of {} minutes",
                        changes.len(),
                        total
                    )
                };
                ReflowOutcome {
                    success: true,
                    updated_work_orders: schedule,
                    changes,
                    explanation,
                    errors: Vec::new(),
                }
            }
            Err(errors) => {
                warn!(violations = errors.len(), "reflowed schedule is not valid");
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                ReflowOutcome {
                    success: false,
                    updated_work_orders: schedule,
                    changes,
                    explanation: messages.join("; "),
                    errors: messages,
                }
            }
        };

        info!(
            success = outcome.success,
            changes = outcome.changes.len(),
            "reflow finished"
        );
        Ok(outcome)
    }

    /// Picks the audit reason for a moved order.
    ///
    /// Dependency delay wins when any dependency now ends past the order's
    /// original start; otherwise sharing the work center with any other
    /// order counts as a conflict; otherwise only the calendar moved it.
    fn classify_change(
        &self,
        order: &WorkOrder,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
        work_orders: &[WorkOrder],
        placed_ends: &HashMap<String, DateTime<Utc>>,
    ) -> Change {
        let dependency_delayed = order.depends_on.iter().any(|dep| {
            placed_ends
                .get(dep)
                .is_some_and(|end| *end > order.start)
        });
        if dependency_delayed {
            Change::dependency_delay(order, new_start, new_end)
        } else if work_orders
            .iter()
            .any(|other| other.id != order.id && other.work_center_id == order.work_center_id)
        {
            Change::work_center_conflict(order, new_start, new_end)
        } else {
            Change::calendar_constraint(order, new_start, new_end)
        }
    }
}

/// Indices of the movable (non-pinned) orders in dependency order.
///
/// Kahn's algorithm; the ready set is ordered by input position so the
/// sweep is deterministic and earlier input wins contested slots. Callers
/// have already rejected cyclic input, so every movable order is emitted.
fn dependency_order(orders: &[WorkOrder]) -> Vec<usize> {
    let index_of: HashMap<&str, usize> = orders
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.is_maintenance)
        .map(|(i, o)| (o.id.as_str(), i))
        .collect();

    let mut indegree = vec![0usize; orders.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); orders.len()];
    for (i, order) in orders.iter().enumerate() {
        if order.is_maintenance {
            continue;
        }
        for dep in &order.depends_on {
            // Pinned dependencies are placed up front and never constrain order.
            if let Some(&d) = index_of.get(dep.as_str()) {
                dependents[d].push(i);
                indegree[i] += 1;
            }
        }
    }

    let mut ready: BTreeSet<usize> = orders
        .iter()
        .enumerate()
        .filter(|(i, o)| !o.is_maintenance && indegree[*i] == 0)
        .map(|(i, _)| i)
        .collect();

    let mut sweep = Vec::with_capacity(index_of.len());
    while let Some(i) = ready.pop_first() {
        sweep.push(i);
        for &dependent in &dependents[i] {
            indegree[dependent] -= 1;
            if indegree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }
    sweep
}
