//! Work-center conflict resolution.
//!
//! Finds the earliest start at which a work order fits on its machine
//! without overlapping already-placed orders, pushing the candidate past
//! the latest conflicting end until a fixed point.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::calendar::{next_available, project_end};
use crate::error::{ReflowError, ReflowResult};
use crate::models::{WorkCenter, WorkOrder};

/// Upper bound on conflict-resolution rounds for one work order.
pub const CONFLICT_ITERATION_LIMIT: usize = 100;

/// Earliest conflict-free start for `order` at or after `candidate`.
///
/// Each round projects the working end from the candidate start, collects
/// the placed orders it would overlap, and restarts from the next working
/// instant after the latest conflicting end. Terminates because every push
/// moves strictly forward past a conflict; the iteration cap guards against
/// degenerate calendars.
pub fn resolve_conflicts(
    order: &WorkOrder,
    candidate: DateTime<Utc>,
    placed: &[WorkOrder],
    work_center: &WorkCenter,
) -> ReflowResult<DateTime<Utc>> {
    let mut start = candidate;

    for _ in 0..CONFLICT_ITERATION_LIMIT {
        let end = project_end(start, order.duration_minutes, work_center)?;

        let mut probe = order.clone();
        probe.reschedule(start, end);
        let latest_conflicting_end = placed
            .iter()
            .filter(|other| probe.conflicts_with(other))
            .map(|other| other.end)
            .max();

        match latest_conflicting_end {
            None => return Ok(start),
            Some(latest) => {
                debug!(
                    work_order = %order.id,
                    work_center = %work_center.id,
                    pushed_past = %latest,
                    "placement conflicts; pushing start forward"
                );
                start = next_available(latest, work_center)?;
            }
        }
    }

    Err(ReflowError::ConflictLimit {
        work_order: order.id.clone(),
        limit: CONFLICT_ITERATION_LIMIT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn weekday_center() -> WorkCenter {
        WorkCenter::new("WC1").with_weekday_shifts(8, 16)
    }

    fn placed(id: &str, start: &str, minutes: i64) -> WorkOrder {
        WorkOrder::new(id, "WC1", ts(start), minutes)
    }

    #[test]
    fn test_no_conflicts_keeps_candidate() {
        let wc = weekday_center();
        let order = WorkOrder::new("X", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        let start =
            resolve_conflicts(&order, ts("2024-01-01T09:00:00Z"), &[], &wc).unwrap();
        assert_eq!(start, ts("2024-01-01T09:00:00Z"));
    }

    #[test]
    fn test_pushed_past_single_conflict() {
        let wc = weekday_center();
        let order = WorkOrder::new("X", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        let occupied = vec![placed("A", "2024-01-01T09:00:00Z", 60)];
        let start =
            resolve_conflicts(&order, ts("2024-01-01T09:00:00Z"), &occupied, &wc).unwrap();
        assert_eq!(start, ts("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn test_pushed_past_latest_of_several() {
        let wc = weekday_center();
        let order = WorkOrder::new("X", "WC1", ts("2024-01-01T09:00:00Z"), 240);
        // Both placed orders overlap the 4-hour candidate; the later end wins
        let occupied = vec![
            placed("A", "2024-01-01T09:00:00Z", 60),
            placed("B", "2024-01-01T11:00:00Z", 60),
        ];
        let start =
            resolve_conflicts(&order, ts("2024-01-01T09:00:00Z"), &occupied, &wc).unwrap();
        assert_eq!(start, ts("2024-01-01T12:00:00Z"));
    }

    #[test]
    fn test_cascading_conflicts() {
        let wc = weekday_center();
        let order = WorkOrder::new("X", "WC1", ts("2024-01-01T09:00:00Z"), 60);
        // Pushing past A lands on B; pushing past B is free
        let occupied = vec![
            placed("A", "2024-01-01T09:00:00Z", 60),
            placed("B", "2024-01-01T10:30:00Z", 60),
        ];
        let start =
            resolve_conflicts(&order, ts("2024-01-01T09:00:00Z"), &occupied, &wc).unwrap();
        assert_eq!(start, ts("2024-01-01T11:30:00Z"));
    }

    #[test]
    fn test_push_lands_on_next_day() {
        let wc = weekday_center();
        let order = WorkOrder::new("X", "WC1", ts("2024-01-01T15:00:00Z"), 60);
        // The conflicting order runs to the shift end
        let occupied = vec![placed("A", "2024-01-01T14:00:00Z", 120)];
        let start =
            resolve_conflicts(&order, ts("2024-01-01T15:00:00Z"), &occupied, &wc).unwrap();
        assert_eq!(start, ts("2024-01-02T08:00:00Z"));
    }

    #[test]
    fn test_fits_between_orders() {
        let wc = weekday_center();
        let order = WorkOrder::new("X", "WC1", ts("2024-01-01T10:00:00Z"), 60);
        // The 10:00-11:00 gap is exactly wide enough (half-open intervals)
        let occupied = vec![
            placed("A", "2024-01-01T09:00:00Z", 60),
            placed("B", "2024-01-01T11:00:00Z", 60),
        ];
        let start =
            resolve_conflicts(&order, ts("2024-01-01T10:00:00Z"), &occupied, &wc).unwrap();
        assert_eq!(start, ts("2024-01-01T10:00:00Z"));
    }
}
