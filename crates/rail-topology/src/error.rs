//! Topology-subsystem error type.

use thiserror::Error;

use rail_core::NodeId;

/// Errors produced by `rail-topology`.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("unknown node {0:?}")]
    UnknownNode(String),

    #[error("unknown signal {0:?}")]
    UnknownSignal(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
