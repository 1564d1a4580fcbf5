//! Work center (machine) model.
//!
//! A work center is a machine that processes one work order at a time.
//! Its availability is a weekly shift pattern minus absolute maintenance
//! windows.
//!
//! # Time Model
//! All instants are `chrono::DateTime<Utc>`. Shifts are weekly-recurring
//! hour ranges on a weekday; maintenance windows are absolute intervals.
//! Both are half-open: a shift covers `[start_hour:00, end_hour:00)` and a
//! window covers `[start, end)`.
//!
//! # Precedence
//! Maintenance windows override shifts. An instant is working time iff it
//! falls inside the weekday's shift AND inside no maintenance window.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// A recurring working period on one weekday.
///
/// Weekday numbering follows `weekday_iso mod 7`: Sunday=0, Monday=1, …,
/// Saturday=6 (chrono's `num_days_from_sunday`). A work center has at most
/// one shift per weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// Weekday this shift applies to (0=Sunday .. 6=Saturday).
    pub day_of_week: u8,
    /// First working hour (inclusive, 0..=24).
    pub start_hour: u32,
    /// Hour the shift ends (exclusive, 0..=24).
    pub end_hour: u32,
}

impl Shift {
    /// Creates a shift on the given weekday.
    pub fn new(day_of_week: u8, start_hour: u32, end_hour: u32) -> Self {
        Self {
            day_of_week,
            start_hour,
            end_hour,
        }
    }

    /// Working minutes in one occurrence of this shift.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_hour as i64 - self.start_hour as i64) * 60
    }
}

/// An absolute blocked interval on a work center.
///
/// Half-open `[start, end)`. May cross day boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (exclusive).
    pub end: DateTime<Utc>,
    /// Optional operator-facing reason.
    pub reason: Option<String>,
}

impl MaintenanceWindow {
    /// Creates a new maintenance window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether an instant falls within this window.
    #[inline]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }

    /// Whether an interval `[start, end)` intersects this window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// A machine with a weekly shift calendar and maintenance windows.
///
/// Immutable during a reflow; identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenter {
    /// Unique work center identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Weekly shift pattern (at most one entry per weekday).
    pub shifts: Vec<Shift>,
    /// Blocked intervals overriding the shift pattern.
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

impl WorkCenter {
    /// Creates a work center with no shifts and no maintenance windows.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            shifts: Vec::new(),
            maintenance_windows: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a shift.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shifts.push(shift);
        self
    }

    /// Adds the same hour range on Monday through Friday.
    pub fn with_weekday_shifts(mut self, start_hour: u32, end_hour: u32) -> Self {
        for day in 1..=5 {
            self.shifts.push(Shift::new(day, start_hour, end_hour));
        }
        self
    }

    /// Adds a maintenance window.
    pub fn with_maintenance(mut self, window: MaintenanceWindow) -> Self {
        self.maintenance_windows.push(window);
        self
    }

    /// Whether any shift is defined.
    #[inline]
    pub fn has_shifts(&self) -> bool {
        !self.shifts.is_empty()
    }

    /// Returns the shift for a weekday (0=Sunday .. 6=Saturday), if any.
    pub fn shift_for_weekday(&self, day_of_week: u8) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.day_of_week == day_of_week)
    }

    /// Returns the shift covering the weekday of `t`, if any.
    pub fn shift_on(&self, t: DateTime<Utc>) -> Option<&Shift> {
        self.shift_for_weekday(t.weekday().num_days_from_sunday() as u8)
    }

    /// Whether `t` falls inside any maintenance window.
    pub fn in_maintenance(&self, t: DateTime<Utc>) -> bool {
        self.maintenance_windows.iter().any(|w| w.contains(t))
    }

    /// Returns a maintenance window containing `t`, if any.
    pub fn maintenance_at(&self, t: DateTime<Utc>) -> Option<&MaintenanceWindow> {
        self.maintenance_windows.iter().find(|w| w.contains(t))
    }

    /// Earliest maintenance-window start strictly inside `(after, before)`.
    ///
    /// Used to break a working segment before it runs into a window.
    pub fn next_maintenance_start(
        &self,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.maintenance_windows
            .iter()
            .map(|w| w.start)
            .filter(|s| *s > after && *s < before)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_shift_duration() {
        let s = Shift::new(1, 8, 16);
        assert_eq!(s.duration_minutes(), 480);
    }

    #[test]
    fn test_maintenance_window_contains() {
        let w = MaintenanceWindow::new(ts("2024-01-01T10:00:00Z"), ts("2024-01-01T11:00:00Z"));
        assert!(w.contains(ts("2024-01-01T10:00:00Z")));
        assert!(w.contains(ts("2024-01-01T10:59:00Z")));
        assert!(!w.contains(ts("2024-01-01T11:00:00Z"))); // exclusive end
        assert!(!w.contains(ts("2024-01-01T09:59:00Z")));
    }

    #[test]
    fn test_maintenance_window_overlaps() {
        let w = MaintenanceWindow::new(ts("2024-01-01T10:00:00Z"), ts("2024-01-01T11:00:00Z"));
        assert!(w.overlaps(ts("2024-01-01T09:00:00Z"), ts("2024-01-01T10:30:00Z")));
        assert!(w.overlaps(ts("2024-01-01T10:30:00Z"), ts("2024-01-01T12:00:00Z")));
        // Touching intervals do not overlap
        assert!(!w.overlaps(ts("2024-01-01T09:00:00Z"), ts("2024-01-01T10:00:00Z")));
        assert!(!w.overlaps(ts("2024-01-01T11:00:00Z"), ts("2024-01-01T12:00:00Z")));
    }

    #[test]
    fn test_shift_for_weekday() {
        let wc = WorkCenter::new("WC1")
            .with_shift(Shift::new(1, 8, 16))
            .with_shift(Shift::new(2, 6, 14));

        assert_eq!(wc.shift_for_weekday(1).unwrap().start_hour, 8);
        assert_eq!(wc.shift_for_weekday(2).unwrap().start_hour, 6);
        assert!(wc.shift_for_weekday(0).is_none());
    }

    #[test]
    fn test_shift_on_uses_sunday_zero() {
        let wc = WorkCenter::new("WC1").with_shift(Shift::new(0, 8, 16));
        // 2024-01-07 was a Sunday
        assert!(wc.shift_on(ts("2024-01-07T09:00:00Z")).is_some());
        // 2024-01-01 was a Monday
        assert!(wc.shift_on(ts("2024-01-01T09:00:00Z")).is_none());
    }

    #[test]
    fn test_weekday_shifts_builder() {
        let wc = WorkCenter::new("WC1").with_weekday_shifts(8, 16);
        assert_eq!(wc.shifts.len(), 5);
        assert!(wc.shift_for_weekday(0).is_none()); // Sunday
        assert!(wc.shift_for_weekday(3).is_some()); // Wednesday
        assert!(wc.shift_for_weekday(6).is_none()); // Saturday
    }

    #[test]
    fn test_in_maintenance() {
        let wc = WorkCenter::new("WC1").with_maintenance(
            MaintenanceWindow::new(ts("2024-01-01T10:00:00Z"), ts("2024-01-01T11:00:00Z"))
                .with_reason("inspection"),
        );

        assert!(wc.in_maintenance(ts("2024-01-01T10:30:00Z")));
        assert!(!wc.in_maintenance(ts("2024-01-01T11:00:00Z")));
        assert_eq!(
            wc.maintenance_at(ts("2024-01-01T10:30:00Z"))
                .and_then(|w| w.reason.as_deref()),
            Some("inspection")
        );
    }

    #[test]
    fn test_next_maintenance_start() {
        let wc = WorkCenter::new("WC1")
            .with_maintenance(MaintenanceWindow::new(
                ts("2024-01-01T10:00:00Z"),
                ts("2024-01-01T11:00:00Z"),
            ))
            .with_maintenance(MaintenanceWindow::new(
                ts("2024-01-01T13:00:00Z"),
                ts("2024-01-01T14:00:00Z"),
            ));

        // Earliest window opening strictly inside the range
        assert_eq!(
            wc.next_maintenance_start(ts("2024-01-01T09:00:00Z"), ts("2024-01-01T16:00:00Z")),
            Some(ts("2024-01-01T10:00:00Z"))
        );
        // A window starting exactly at `after` is excluded
        assert_eq!(
            wc.next_maintenance_start(ts("2024-01-01T10:00:00Z"), ts("2024-01-01T12:00:00Z")),
            None
        );
        assert_eq!(
            wc.next_maintenance_start(ts("2024-01-01T11:00:00Z"), ts("2024-01-01T16:00:00Z")),
            Some(ts("2024-01-01T13:00:00Z"))
        );
    }
}
