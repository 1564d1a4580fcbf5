//! Calendar-aware reflow engine for manufacturing schedules.
//!
//! Takes work centers (machines with weekly shift calendars and maintenance
//! windows) and work orders (durations, dependencies, optional pin flag)
//! whose current placements may be invalid, and recomputes start/end times
//! so every constraint holds, with an audit log of what moved and why.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `WorkCenter`, `WorkOrder`, `Schedule`,
//!   `Change`, `ReflowOutcome`
//! - **`calendar`**: Working-time arithmetic across shifts and maintenance
//!   windows
//! - **`validation`**: Constraint predicates, cycle detection, and the
//!   whole-schedule validator
//! - **`reflow`**: The driver — dependency-ordered placement with greedy
//!   conflict resolution
//! - **`loader`**: JSON document envelopes → models
//! - **`logging`**: `tracing` subscriber setup
//!
//! # Example
//!
//! ```
//! use schedule_reflow::models::{WorkCenter, WorkOrder};
//! use schedule_reflow::reflow::reflow;
//!
//! let centers = vec![WorkCenter::new("WC1").with_weekday_shifts(8, 16)];
//! let orders = vec![
//!     WorkOrder::new("A", "WC1", "2024-01-01T09:00:00Z".parse().unwrap(), 60),
//!     WorkOrder::new("B", "WC1", "2024-01-01T09:00:00Z".parse().unwrap(), 60)
//!         .with_dependency("A"),
//! ];
//!
//! let outcome = reflow(&centers, &orders).unwrap();
//! assert!(outcome.success);
//! let b = outcome.updated_work_orders.find_order("B").unwrap();
//! assert_eq!(b.start, "2024-01-01T10:00:00Z".parse().unwrap());
//! ```
//!
//! # Reference
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod calendar;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod reflow;
pub mod validation;

pub use error::{ReflowError, ReflowResult};
pub use models::{Change, MaintenanceWindow, ReflowOutcome, Schedule, Shift, WorkCenter, WorkOrder};
pub use reflow::{reflow, ReflowEngine};
