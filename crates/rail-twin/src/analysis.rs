//! The per-cycle analysis pass: predict conflicts, map them to actions, and
//! fold in the schedule optimizer's view of the same snapshot.

use log::{info, warn};

use rail_core::{Severity, Timestamp, Urgency};
use rail_predict::{ConflictPrediction, ConflictPredictor, PrescriptiveAction, PrescriptiveMapper};
use rail_schedule::{
    ConflictScorer, FixpointScheduler, HeuristicScorer, HybridOptimizer, Objective,
    OptimizationResult, Scheduler, Section, Train,
};
use rail_state::NetworkSnapshot;
use rail_topology::RailNetwork;

// ── Report types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisSummary {
    pub high_severity_conflicts: usize,
    pub urgent_recommendations: usize,
    pub total_predicted_delay_minutes: f32,
}

/// Everything one analysis cycle produced, for the HMI and the KPI log.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisReport {
    pub timestamp: Timestamp,
    pub conflicts_predicted: usize,
    pub recommendations_generated: usize,
    pub conflicts: Vec<ConflictPrediction>,
    pub recommendations: Vec<PrescriptiveAction>,
    /// The optimizer's contribution, absent when no optimizer is configured
    /// or this cycle's solve failed (the heuristic output above still
    /// stands).
    pub optimization: Option<OptimizationResult>,
    pub summary: AnalysisSummary,
}

// ── AnalysisEngine ────────────────────────────────────────────────────────────

/// Composes the conflict predictor, the prescriptive mapper, and (optionally)
/// the schedule optimizer into a single analysis call over one snapshot.
pub struct AnalysisEngine<S: Scheduler, C: ConflictScorer> {
    predictor: ConflictPredictor,
    mapper: PrescriptiveMapper,
    optimizer: Option<HybridOptimizer<S, C>>,
}

impl AnalysisEngine<FixpointScheduler, HeuristicScorer> {
    /// Predictor + mapper only; no optimizer contribution.
    pub fn heuristic_only() -> Self {
        Self {
            predictor: ConflictPredictor::default(),
            mapper: PrescriptiveMapper,
            optimizer: None,
        }
    }

    /// The stock configuration: default predictor, fixpoint scheduler, and
    /// rule-based scoring.
    pub fn with_default_optimizer(objective: Objective) -> Self {
        Self {
            predictor: ConflictPredictor::default(),
            mapper: PrescriptiveMapper,
            optimizer: Some(HybridOptimizer::new(
                FixpointScheduler,
                HeuristicScorer,
                objective,
            )),
        }
    }
}

impl<S: Scheduler, C: ConflictScorer> AnalysisEngine<S, C> {
    pub fn new(
        predictor: ConflictPredictor,
        mapper: PrescriptiveMapper,
        optimizer: Option<HybridOptimizer<S, C>>,
    ) -> Self {
        Self {
            predictor,
            mapper,
            optimizer,
        }
    }

    /// Run one full predictive + prescriptive cycle over `snapshot`.
    ///
    /// An optimizer failure is logged and dropped — the cycle still returns
    /// the heuristic conflicts and recommendations.
    pub fn analyze(&self, snapshot: &NetworkSnapshot, network: &RailNetwork) -> AnalysisReport {
        let conflicts = self.predictor.predict(snapshot, network);
        let recommendations = self.mapper.recommend(&conflicts, snapshot);
        info!(
            "analysis cycle at {}: {} conflicts, {} recommendations",
            snapshot.taken_at,
            conflicts.len(),
            recommendations.len()
        );

        let optimization = self.optimizer.as_ref().and_then(|optimizer| {
            let (trains, sections) = planning_inputs(snapshot, network);
            if trains.is_empty() {
                return None;
            }
            let result = optimizer.optimize(&trains, &sections);
            if result.success {
                Some(result)
            } else {
                warn!("optimizer contributed nothing this cycle: {}", result.explanation);
                None
            }
        });

        let summary = AnalysisSummary {
            high_severity_conflicts: conflicts
                .iter()
                .filter(|c| c.severity >= Severity::High)
                .count(),
            urgent_recommendations: recommendations
                .iter()
                .filter(|r| r.urgency == Urgency::High)
                .count(),
            total_predicted_delay_minutes: conflicts
                .iter()
                .map(|c| c.estimated_delay_minutes)
                .sum(),
        };

        AnalysisReport {
            timestamp: snapshot.taken_at,
            conflicts_predicted: conflicts.len(),
            recommendations_generated: recommendations.len(),
            conflicts,
            recommendations,
            optimization,
            summary,
        }
    }
}

// ── Planning-input derivation ─────────────────────────────────────────────────

/// Build the optimizer's planning inputs from the snapshot and topology.
///
/// Trains come straight from the snapshot (the optimizer never sees a train
/// the snapshot does not contain).  Sections are derived one-per-block —
/// a block section admits one train, so each gets capacity 1 — with
/// occupants filled from the trains' kilometre positions.
pub fn planning_inputs(
    snapshot: &NetworkSnapshot,
    network: &RailNetwork,
) -> (Vec<Train>, Vec<Section>) {
    let trains: Vec<Train> = snapshot
        .trains
        .iter()
        .map(|t| {
            let km = network
                .node_km
                .get(t.state.current_node.index())
                .copied()
                .unwrap_or(0.0);
            Train {
                train_id: t.train_id.clone(),
                number: t.train_id.clone(),
                train_type: t.state.priority.as_str().to_owned(),
                priority: t.state.priority,
                current_km: km,
                destination_km: km,
                scheduled_arrival: snapshot.taken_at,
                actual_arrival: None,
                current_speed_kmh: t.state.current_speed_kmh,
                max_speed_kmh: 100.0,
            }
        })
        .collect();

    let sections: Vec<Section> = (0..network.block_count())
        .map(|i| {
            let from_km = network.node_km[network.block_from[i].index()];
            let to_km = network.node_km[network.block_to[i].index()];
            let (start_km, end_km) = if from_km <= to_km {
                (from_km, to_km)
            } else {
                (to_km, from_km)
            };
            let occupants = trains
                .iter()
                .filter(|t| start_km <= t.current_km && t.current_km <= end_km)
                .map(|t| t.train_id.clone())
                .collect();
            Section {
                section_id: network.block_name[i].clone(),
                start_km,
                end_km,
                speed_kmh: 100.0,
                capacity: 1,
                occupants,
            }
        })
        .collect();

    (trains, sections)
}
