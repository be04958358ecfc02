//! Simulation-subsystem error type.

use thiserror::Error;

/// Errors produced by the what-if entry points.
///
/// The engine raises only for truly invalid requests; an unreachable reroute
/// target is a degraded no-op, not an error (see [`SimEngine`]).
///
/// [`SimEngine`]: crate::SimEngine
#[derive(Debug, Error)]
pub enum SimError {
    #[error("train {0:?} not found in current state")]
    TrainNotFound(String),

    #[error("unsupported what-if action {0:?}")]
    UnsupportedAction(String),
}

pub type SimResult<T> = Result<T, SimError>;
