//! Twin-level error type.

use thiserror::Error;

use rail_sim::SimError;
use rail_topology::TopologyError;

/// Errors surfaced by the twin's entry points.
///
/// Ingestion never raises — malformed feed fields degrade to zero/unknown —
/// so everything here comes from the what-if path.
#[derive(Debug, Error)]
pub enum TwinError {
    #[error("REROUTE what-if requires a target_node")]
    MissingTarget,

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

pub type TwinResult<T> = Result<T, TwinError>;
