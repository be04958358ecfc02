//! Point-in-time copies of the live state.

use rail_core::{Aspect, BlockId, SignalId, Timestamp};

use crate::state::TrainState;

/// One train as observed in a snapshot.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainObs {
    pub train_id: String,
    pub state: TrainState,
}

/// One signal as observed in a snapshot.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalObs {
    pub signal: SignalId,
    pub aspect: Aspect,
}

/// One block section as observed in a snapshot.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockObs {
    pub block: BlockId,
    pub occupied_by: Option<String>,
    pub last_cleared: Option<Timestamp>,
}

/// A consistent copy of the whole section state, taken inside the store's
/// critical section and safe to read for as long as the caller likes.
///
/// Trains are sorted by `train_id` so downstream scans are deterministic
/// regardless of hash-map iteration order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkSnapshot {
    /// Time of the last train mutation folded into this copy.
    pub taken_at: Timestamp,
    pub trains: Vec<TrainObs>,
    pub signals: Vec<SignalObs>,
    pub blocks: Vec<BlockObs>,
}

impl NetworkSnapshot {
    /// Look up a train by id.  O(log n) thanks to the sorted order.
    pub fn train(&self, train_id: &str) -> Option<&TrainObs> {
        self.trains
            .binary_search_by(|t| t.train_id.as_str().cmp(train_id))
            .ok()
            .map(|i| &self.trains[i])
    }
}
