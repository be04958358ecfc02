//! Predicted-conflict and prescriptive-action data types.
//!
//! Both are created fresh every analysis cycle and never persisted.

use rail_core::{NodeId, Severity, SignalId, Timestamp, Urgency};

/// The three conflict classes the predictor scans for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictKind {
    Headway,
    Platform,
    Signal,
}

/// Where a conflict is predicted to occur.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictSite {
    Node(NodeId),
    Signal(SignalId),
}

/// A predicted conflict between trains or at infrastructure.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConflictPrediction {
    /// Stable human-readable id, e.g. `HEADWAY_T001_T002`.
    pub id: String,
    pub kind: ConflictKind,
    /// Train ids involved; every id is present in the snapshot that produced
    /// this prediction.
    pub trains: Vec<String>,
    pub site: ConflictSite,
    pub predicted_at: Timestamp,
    /// Likelihood in `[0, 1]`.
    pub probability: f32,
    pub severity: Severity,
    pub estimated_delay_minutes: f32,
}

impl ConflictPrediction {
    /// Ranking score for action generation: probability weighted by severity.
    #[inline]
    pub fn score(&self) -> f32 {
        self.probability * self.severity.weight()
    }
}

/// What a recommended action asks the controller to do.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Hold { duration_minutes: f32 },
    Reroute { target: NodeId },
    SpeedChange { target_speed_kmh: f32 },
    PriorityOverride,
}

/// A recommended action to prevent or resolve a predicted conflict.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrescriptiveAction {
    pub id: String,
    pub kind: ActionKind,
    pub target_train: String,
    pub expected_benefit: String,
    pub confidence: f32,
    pub urgency: Urgency,
}
