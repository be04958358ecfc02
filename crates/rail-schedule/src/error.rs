//! Schedule-subsystem error type.

use std::time::Duration;

use thiserror::Error;

/// Solver-level failures.  The optimizer catches these and degrades to a
/// typed `success = false` result rather than propagating.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("solver exceeded its {0:?} wall-clock budget")]
    Timeout(Duration),

    #[error("no feasible schedule within the {horizon_minutes} min horizon (train {train_id:?})")]
    Infeasible {
        train_id: String,
        horizon_minutes: u32,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
