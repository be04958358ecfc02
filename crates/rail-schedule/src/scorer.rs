//! Per-train conflict-probability scoring.
//!
//! The refinement pass of the optimizer asks "how likely is this train to
//! run into trouble?" and adjusts holds accordingly.  The answer comes from a
//! [`ConflictScorer`] chosen at construction time — a rule-based estimate by
//! default, a trained model where one is available.  The two are never
//! branched between inline.

use crate::problem::{Section, Train};

/// Strategy interface for per-train conflict probability in `[0, 1]`.
pub trait ConflictScorer: Send + Sync {
    fn score(&self, train: &Train, sections: &[Section]) -> f32;
}

/// Feature pair shared by both scorers: normalized lateness and the
/// occupancy ratio of the section the train currently sits in.
fn features(train: &Train, sections: &[Section]) -> (f32, f32) {
    let delay_factor = (train.delay_minutes() / 30.0).min(1.0);
    let occupancy = sections
        .iter()
        .find(|s| s.contains(train.current_km))
        .map(Section::occupancy_ratio)
        .unwrap_or(0.0);
    (delay_factor, occupancy)
}

// ── HeuristicScorer ───────────────────────────────────────────────────────────

/// Rule-based estimate used when no trained model is available: the mean of
/// the lateness factor and the section occupancy ratio, clamped to `[0, 1]`.
pub struct HeuristicScorer;

impl ConflictScorer for HeuristicScorer {
    fn score(&self, train: &Train, sections: &[Section]) -> f32 {
        let (delay_factor, occupancy) = features(train, sections);
        ((delay_factor + occupancy) / 2.0).clamp(0.0, 1.0)
    }
}

// ── LearnedScorer ─────────────────────────────────────────────────────────────

/// Logistic model over the same feature pair, with weights fitted offline.
pub struct LearnedScorer {
    bias: f32,
    w_delay: f32,
    w_occupancy: f32,
}

impl LearnedScorer {
    pub fn from_weights(bias: f32, w_delay: f32, w_occupancy: f32) -> Self {
        Self {
            bias,
            w_delay,
            w_occupancy,
        }
    }
}

impl ConflictScorer for LearnedScorer {
    fn score(&self, train: &Train, sections: &[Section]) -> f32 {
        let (delay_factor, occupancy) = features(train, sections);
        let z = self.bias + self.w_delay * delay_factor + self.w_occupancy * occupancy;
        1.0 / (1.0 + (-z).exp())
    }
}
