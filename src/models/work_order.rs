//! Work order model.
//!
//! A work order is the unit of manufacturing work: a duration on one work
//! center, with precedence dependencies on other work orders. Its
//! `[start, end)` placement is rewritten by the reflow engine unless the
//! order is maintenance-pinned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of manufacturing work assigned to one work center.
///
/// `start`/`end` carry the current (possibly invalid) placement on input
/// and the recomputed placement on output. A maintenance-pinned order
/// (`is_maintenance = true`) is authoritative: the engine never moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    /// Unique work order identifier.
    pub id: String,
    /// Operator-facing work order number.
    pub number: String,
    /// Parent manufacturing order, if any.
    pub manufacturing_order_id: Option<String>,
    /// Work center this order runs on.
    pub work_center_id: String,
    /// Placement start (inclusive).
    pub start: DateTime<Utc>,
    /// Placement end (exclusive).
    pub end: DateTime<Utc>,
    /// Working minutes required (calendar time may be longer).
    pub duration_minutes: i64,
    /// Pinned maintenance order; never rescheduled.
    pub is_maintenance: bool,
    /// Ids of work orders that must finish before this one starts.
    pub depends_on: Vec<String>,
}

impl WorkOrder {
    /// Creates a work order starting at `start` for `duration_minutes`.
    ///
    /// The initial `end` is the naive `start + duration`; the reflow engine
    /// recomputes it against the work center calendar. `number` defaults to
    /// the id.
    pub fn new(
        id: impl Into<String>,
        work_center_id: impl Into<String>,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Self {
        let id = id.into();
        Self {
            number: id.clone(),
            id,
            manufacturing_order_id: None,
            work_center_id: work_center_id.into(),
            start,
            end: start + chrono::Duration::minutes(duration_minutes),
            duration_minutes,
            is_maintenance: false,
            depends_on: Vec::new(),
        }
    }

    /// Sets the work order number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Sets the parent manufacturing order.
    pub fn with_manufacturing_order(mut self, id: impl Into<String>) -> Self {
        self.manufacturing_order_id = Some(id.into());
        self
    }

    /// Sets the placement end.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = end;
        self
    }

    /// Adds a dependency on another work order.
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    /// Marks this order as maintenance-pinned.
    pub fn pinned(mut self) -> Self {
        self.is_maintenance = true;
        self
    }

    /// Rewrites the placement interval.
    pub fn reschedule(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.start = start;
        self.end = end;
    }

    /// Whether this order and `other` occupy the same work center at
    /// overlapping times.
    ///
    /// Intervals are half-open, so back-to-back orders do not conflict.
    pub fn conflicts_with(&self, other: &WorkOrder) -> bool {
        self.work_center_id == other.work_center_id
            && self.start < other.end
            && self.end > other.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_work_order_builder() {
        let wo = WorkOrder::new("A", "WC1", ts("2024-01-01T09:00:00Z"), 120)
            .with_number("WO-0001")
            .with_manufacturing_order("MO-7")
            .with_dependency("B")
            .pinned();

        assert_eq!(wo.id, "A");
        assert_eq!(wo.number, "WO-0001");
        assert_eq!(wo.manufacturing_order_id.as_deref(), Some("MO-7"));
        assert_eq!(wo.work_center_id, "WC1");
        assert_eq!(wo.end, ts("2024-01-01T11:00:00Z"));
        assert_eq!(wo.depends_on, vec!["B"]);
        assert!(wo.is_maintenance);
    }

    #[test]
    fn test_number_defaults_to_id() {
        let wo = WorkOrder::new("A", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        assert_eq!(wo.number, "A");
    }

    #[test]
    fn test_reschedule() {
        let mut wo = WorkOrder::new("A", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        wo.reschedule(ts("2024-01-01T10:00:00Z"), ts("2024-01-01T11:00:00Z"));
        assert_eq!(wo.start, ts("2024-01-01T10:00:00Z"));
        assert_eq!(wo.end, ts("2024-01-01T11:00:00Z"));
    }

    #[test]
    fn test_conflicts_with_same_center() {
        let a = WorkOrder::new("A", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        let b = WorkOrder::new("B", "WC1", ts("2024-01-01T09:30:00Z"), 60);
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn test_back_to_back_does_not_conflict() {
        let a = WorkOrder::new("A", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        let b = WorkOrder::new("B", "WC1", ts("2024-01-01T10:00:00Z"), 60);
        assert!(!a.conflicts_with(&b));
        assert!(!b.conflicts_with(&a));
    }

    #[test]
    fn test_no_conflict_across_centers() {
        let a = WorkOrder::new("A", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        let b = WorkOrder::new("B", "WC2", ts("2024-01-01T09:00:00Z"), 60);
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_zero_duration_inside_other_conflicts() {
        let a = WorkOrder::new("A", "WC1", ts("2024-01-01T09:30:00Z"), 0);
        let b = WorkOrder::new("B", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        assert!(a.conflicts_with(&b));
    }
}
