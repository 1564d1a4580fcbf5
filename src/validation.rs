//! Constraint checking for work-order schedules.
//!
//! Provides the predicates the reflow engine is built on and a
//! whole-schedule validator. Detects:
//! - Duplicate work order ids
//! - Circular dependencies (DFS with a recursion-stack set)
//! - Orders starting before a dependency completes
//! - Overlapping orders on one work center
//! - Orders intersecting a maintenance window
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (DFS cycle
//! detection)

use std::collections::{HashMap, HashSet};

use crate::models::{Schedule, WorkCenter, WorkOrder};

/// A constraint or structural violation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two work orders share the same id.
    DuplicateId,
    /// The dependency graph contains a cycle.
    CyclicDependency,
    /// An order starts before a dependency completes, or the dependency
    /// is missing from the schedule.
    UnsatisfiedDependency,
    /// Two orders overlap on one work center.
    WorkCenterOverlap,
    /// An order intersects a maintenance window of its work center.
    MaintenanceOverlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Finds work orders sharing an id.
pub fn find_duplicate_ids(orders: &[WorkOrder]) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();
    for order in orders {
        if !seen.insert(order.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate work order ID: {}", order.id),
            ));
        }
    }
    errors
}

/// Whether every dependency of `order` exists in `pool` and completes no
/// later than the order starts.
///
/// The pool spans all work centers; dependencies routinely cross machines.
pub fn dependencies_satisfied(order: &WorkOrder, pool: &HashMap<&str, &WorkOrder>) -> bool {
    order.depends_on.iter().all(|dep_id| {
        pool.get(dep_id.as_str())
            .is_some_and(|dep| dep.end <= order.start)
    })
}

/// Detects cycles in the dependency graph.
///
/// DFS with a recursion-stack set; each cycle is reported once as
/// `Circular dependency detected: A → B → … → A`. Dependency ids that match
/// no order cannot form a cycle and are ignored here (the engine rejects
/// them separately).
pub fn detect_cycles<'a, I>(orders: I) -> Vec<ValidationError>
where
    I: IntoIterator<Item = &'a WorkOrder>,
{
    let orders: Vec<&WorkOrder> = orders.into_iter().collect();
    let adjacency: HashMap<&str, &[String]> = orders
        .iter()
        .map(|o| (o.id.as_str(), o.depends_on.as_slice()))
        .collect();

    let mut visited = HashSet::new();
    let mut errors = Vec::new();

    for order in &orders {
        if !visited.contains(order.id.as_str()) {
            let mut stack = Vec::new();
            let mut on_stack = HashSet::new();
            cycle_dfs(
                order.id.as_str(),
                &adjacency,
                &mut visited,
                &mut stack,
                &mut on_stack,
                &mut errors,
            );
        }
    }

    errors
}

fn cycle_dfs<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, &'a [String]>,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    visited.insert(node);
    stack.push(node);
    on_stack.insert(node);

    if let Some(deps) = adjacency.get(node) {
        for dep in deps.iter() {
            let dep = dep.as_str();
            if on_stack.contains(dep) {
                // Back edge: the cycle is the stack suffix from `dep` down
                let pos = stack.iter().position(|&n| n == dep).unwrap_or(0);
                let mut path: Vec<&str> = stack[pos..].to_vec();
                path.push(dep);
                errors.push(ValidationError::new(
                    ValidationErrorKind::CyclicDependency,
                    format!("Circular dependency detected: {}", path.join(" → ")),
                ));
            } else if adjacency.contains_key(dep) && !visited.contains(dep) {
                cycle_dfs(dep, adjacency, visited, stack, on_stack, errors);
            }
        }
    }

    on_stack.remove(node);
    stack.pop();
}

/// Validates a complete schedule against every constraint.
///
/// Checks, in order: dependency cycles across all placed orders, then per
/// placed order (a) dependencies satisfied against the full placed pool,
/// (b) pairwise overlap on its work center, (c) intersection with any
/// maintenance window of its work center.
///
/// # Returns
/// `Ok(())` if the schedule is valid, `Err(errors)` with every detected
/// violation.
pub fn validate_schedule(
    schedule: &Schedule,
    work_centers: &[WorkCenter],
) -> Result<(), Vec<ValidationError>> {
    let mut errors = detect_cycles(schedule.all_orders());

    let pool: HashMap<&str, &WorkOrder> = schedule
        .all_orders()
        .map(|o| (o.id.as_str(), o))
        .collect();

    for (center_id, orders) in schedule.iter() {
        let center = work_centers.iter().find(|c| c.id == center_id);

        for (i, order) in orders.iter().enumerate() {
            if !dependencies_satisfied(order, &pool) {
                for dep_id in &order.depends_on {
                    match pool.get(dep_id.as_str()) {
                        None => errors.push(ValidationError::new(
                            ValidationErrorKind::UnsatisfiedDependency,
                            format!(
                                "Work order '{}' depends on '{}' which is not in the schedule",
                                order.id, dep_id
                            ),
                        )),
                        Some(dep) if dep.end > order.start => {
                            errors.push(ValidationError::new(
                                ValidationErrorKind::UnsatisfiedDependency,
                                format!(
                                    "Work order '{}' starts at {} before dependency '{}' completes at {}",
                                    order.id, order.start, dep.id, dep.end
                                ),
                            ));
                        }
                        _ => {}
                    }
                }
            }

            for other in &orders[i + 1..] {
                if order.conflicts_with(other) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::WorkCenterOverlap,
                        format!(
                            "Work orders '{}' and '{}' overlap on work center '{}'",
                            order.id, other.id, center_id
                        ),
                    ));
                }
            }

            if let Some(center) = center {
                for window in &center.maintenance_windows {
                    if window.overlaps(order.start, order.end) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::MaintenanceOverlap,
                            format!(
                                "Work order '{}' intersects a maintenance window on work center '{}' ({} – {})",
                                order.id, center_id, window.start, window.end
                            ),
                        ));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
