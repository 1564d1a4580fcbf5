//! Reflow domain models.
//!
//! Core data types for the scheduling problem and its solution:
//!
//! | Type | Role |
//! |------|------|
//! | [`WorkCenter`] | Machine with weekly shifts and maintenance windows |
//! | [`WorkOrder`] | Unit of work with duration, dependencies, pin flag |
//! | [`Schedule`] | Placed orders grouped by work center |
//! | [`Change`] | Audit record for one rescheduled order |
//! | [`ReflowOutcome`] | Result of a reflow run |

mod schedule;
mod work_center;
mod work_order;

pub use schedule::{Change, ReflowOutcome, Schedule};
pub use work_center::{MaintenanceWindow, Shift, WorkCenter};
pub use work_order::WorkOrder;
