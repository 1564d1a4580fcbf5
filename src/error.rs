//! Fatal engine errors.
//!
//! Only unrecoverable conditions are surfaced as `Err`: unresolvable
//! references and exhausted iteration bounds. Everything the engine can
//! report about (cycles, constraint violations, empty input) comes back
//! inside a [`ReflowOutcome`](crate::models::ReflowOutcome) with
//! `success = false` instead.

use thiserror::Error;

/// Result alias for fallible engine operations.
pub type ReflowResult<T> = Result<T, ReflowError>;

/// Unrecoverable reflow failures.
#[derive(Debug, Error)]
pub enum ReflowError {
    /// A work order references a work center that was not supplied.
    #[error("work order '{work_order}' references unknown work center '{work_center}'")]
    UnknownWorkCenter {
        work_order: String,
        work_center: String,
    },

    /// A work order depends on an id that matches no input work order.
    #[error("work order '{work_order}' depends on unknown work order '{dependency}'")]
    UnknownDependency {
        work_order: String,
        dependency: String,
    },

    /// The work center has no shifts, so no working instant exists.
    #[error("work center '{work_center}' has no shifts; it never becomes available")]
    NoWorkingTime { work_center: String },

    /// Calendar projection failed to terminate within its iteration bound.
    #[error("calendar projection on work center '{work_center}' exceeded {limit} iterations")]
    ProjectionLimit { work_center: String, limit: usize },

    /// Conflict resolution failed to reach a fixed point within its bound.
    #[error("conflict resolution for work order '{work_order}' exceeded {limit} iterations")]
    ConflictLimit { work_order: String, limit: usize },
}
