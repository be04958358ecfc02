//! External ingestion records.
//!
//! These are the shapes the live (or mock) data feed delivers on every
//! synchronization cycle.  Every field beyond the identifying one is
//! defaulted: a malformed record degrades to zero/unknown rather than
//! failing the cycle.

/// One periodic snapshot from the field systems.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapshotFeed {
    /// Unix seconds at which the field state was sampled.
    pub timestamp: i64,
    pub trains: Vec<TrainFeedRecord>,
    pub signals: Vec<SignalFeedRecord>,
    pub section_status: Vec<BlockFeedRecord>,
}

/// Position and motion report for one train.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainFeedRecord {
    pub train_id: String,
    /// Topology node name; an empty or unknown name leaves the train at an
    /// unresolved position.
    pub current_node: String,
    pub current_speed: f32,
    pub target_speed: f32,
    pub acceleration: f32,
    /// Priority ordinal (1 = highest precedence).  Zero/unknown maps to the
    /// default class.
    pub priority: u8,
}

/// Aspect report for one signal.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignalFeedRecord {
    pub signal_id: String,
    /// Wire spelling, e.g. `"RED"` or `"DOUBLE_YELLOW"`.
    pub aspect: String,
}

/// Occupancy report for one block section.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlockFeedRecord {
    pub block_id: String,
    pub occupied_by: Option<String>,
}
