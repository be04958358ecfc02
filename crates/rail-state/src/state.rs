//! Live per-train state.

use rail_core::{EdgeId, NodeId, Timestamp, TrainPriority};

/// The real-time state of one train as last reported by the feed.
///
/// One instance exists per active train; each ingestion cycle **replaces**
/// the previous instance for a given train id wholesale (no field merging).
/// Ownership is held exclusively by the [`StateStore`](crate::StateStore);
/// everything handed out is a copy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainState {
    /// Node the train was last reported at (or `INVALID` if the feed's node
    /// name could not be resolved against the topology).
    pub current_node: NodeId,
    /// Track segment the train is on, if mid-section.
    pub current_edge: Option<EdgeId>,
    /// Metres from the start of `current_edge`.
    pub position_on_edge_m: f32,
    pub current_speed_kmh: f32,
    pub target_speed_kmh: f32,
    pub acceleration_ms2: f32,
    pub priority: TrainPriority,
    pub last_update: Timestamp,
}

impl TrainState {
    /// A train standing at `node` at time `at`.
    pub fn at_node(node: NodeId, priority: TrainPriority, at: Timestamp) -> Self {
        Self {
            current_node: node,
            current_edge: None,
            position_on_edge_m: 0.0,
            current_speed_kmh: 0.0,
            target_speed_kmh: 0.0,
            acceleration_ms2: 0.0,
            priority,
            last_update: at,
        }
    }

    /// A copy of this state pinned to zero speed and acceleration, position
    /// unchanged — what a held train looks like.
    pub fn held(&self, at: Timestamp) -> Self {
        Self {
            current_speed_kmh: 0.0,
            target_speed_kmh: 0.0,
            acceleration_ms2: 0.0,
            last_update: at,
            ..self.clone()
        }
    }
}

/// Occupancy state of one block section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockState {
    /// Train currently detected in the block, if any.
    pub occupied_by: Option<String>,
    /// When the block last went from occupied to clear.
    pub last_cleared: Option<Timestamp>,
}
