//! Working-time arithmetic over a work center calendar.
//!
//! Two operations drive the reflow engine:
//!
//! - [`next_available`]: snap an instant forward to the next in-shift,
//!   non-maintenance instant.
//! - [`project_end`]: starting from an instant, accumulate a number of
//!   working minutes across shifts and maintenance windows and return the
//!   instant reached.
//!
//! Both walk the calendar iteratively with strictly monotone steps. A work
//! center without shifts has no working time at all and is rejected with
//! [`ReflowError::NoWorkingTime`] rather than searched forever.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::{ReflowError, ReflowResult};
use crate::models::{Shift, WorkCenter};

/// Upper bound on calendar-walk iterations.
///
/// Generous enough for years of sparse calendars; hitting it means the
/// calendar data is degenerate and the run must not pretend to succeed.
pub const PROJECTION_ITERATION_LIMIT: usize = 10_000;

/// Midnight of the day containing `t`.
fn day_start(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Absolute bounds of a shift occurrence on the day containing `t`.
fn shift_bounds(t: DateTime<Utc>, shift: &Shift) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = day_start(t);
    (
        midnight + Duration::hours(shift.start_hour as i64),
        midnight + Duration::hours(shift.end_hour as i64),
    )
}

/// Earliest instant `t' >= t` that is inside a shift and outside every
/// maintenance window of `wc`.
///
/// The shift interval is half-open, so an instant sitting exactly at the
/// shift end rolls over to the next working day.
pub fn next_available(t: DateTime<Utc>, wc: &WorkCenter) -> ReflowResult<DateTime<Utc>> {
    if !wc.has_shifts() {
        return Err(ReflowError::NoWorkingTime {
            work_center: wc.id.clone(),
        });
    }

    let mut current = t;
    for _ in 0..PROJECTION_ITERATION_LIMIT {
        // Maintenance overrides shifts; leave the window first.
        if let Some(window) = wc.maintenance_at(current) {
            current = window.end;
            continue;
        }

        match wc.shift_on(current) {
            None => current = day_start(current) + Duration::days(1),
            Some(shift) => {
                let (shift_start, shift_end) = shift_bounds(current, shift);
                if current < shift_start {
                    current = shift_start;
                } else if current >= shift_end {
                    current = day_start(current) + Duration::days(1);
                } else {
                    return Ok(current);
                }
            }
        }
    }

    Err(ReflowError::ProjectionLimit {
        work_center: wc.id.clone(),
        limit: PROJECTION_ITERATION_LIMIT,
    })
}

/// Instant reached by consuming `duration_minutes` of working time from
/// `start` on `wc`.
///
/// Working time accrues only inside shifts and outside maintenance windows.
/// A window opening mid-shift splits the working segment: work runs up to
/// the window start, skips to the window end (or the next shift if the
/// window swallows the rest of the day), and continues.
///
/// A zero duration returns `start` unchanged.
pub fn project_end(
    start: DateTime<Utc>,
    duration_minutes: i64,
    wc: &WorkCenter,
) -> ReflowResult<DateTime<Utc>> {
    if duration_minutes > 0 && !wc.has_shifts() {
        return Err(ReflowError::NoWorkingTime {
            work_center: wc.id.clone(),
        });
    }

    let mut current = start;
    let mut remaining = duration_minutes;
    let mut iterations = 0;

    while remaining > 0 {
        iterations += 1;
        if iterations > PROJECTION_ITERATION_LIMIT {
            return Err(ReflowError::ProjectionLimit {
                work_center: wc.id.clone(),
                limit: PROJECTION_ITERATION_LIMIT,
            });
        }

        if wc.in_maintenance(current) {
            current = next_available(current, wc)?;
            continue;
        }

        let Some(shift) = wc.shift_on(current) else {
            current = day_start(current) + Duration::days(1);
            continue;
        };

        let (shift_start, shift_end) = shift_bounds(current, shift);
        if current < shift_start {
            current = shift_start;
            continue;
        }
        if current >= shift_end {
            current = day_start(current) + Duration::days(1);
            continue;
        }

        // Work until the shift ends or the next maintenance window opens,
        // whichever comes first.
        let segment_end = wc
            .next_maintenance_start(current, shift_end)
            .unwrap_or(shift_end);
        let available = (segment_end - current).num_minutes();
        let step = available.min(remaining);
        current += Duration::minutes(step);
        remaining -= step;
    }

    Ok(current)
}
