//! Mapping ranked conflicts to candidate controller actions.

use rail_core::{Severity, Urgency};
use rail_state::NetworkSnapshot;

use crate::conflict::{ActionKind, ConflictKind, ConflictPrediction, PrescriptiveAction};

/// Conflicts below this probability are observed but not acted on.
const ACTION_THRESHOLD: f32 = 0.5;

/// Turns a cycle's conflict list into hold/speed-change recommendations.
///
/// Conflicts are processed in descending `probability × severity-weight`
/// order so the most pressing ones claim their trains first.
pub struct PrescriptiveMapper;

impl PrescriptiveMapper {
    pub fn recommend(
        &self,
        conflicts: &[ConflictPrediction],
        snapshot: &NetworkSnapshot,
    ) -> Vec<PrescriptiveAction> {
        let mut ranked: Vec<&ConflictPrediction> = conflicts.iter().collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));

        let mut actions = Vec::new();
        for conflict in ranked {
            if conflict.probability <= ACTION_THRESHOLD {
                continue;
            }
            match conflict.kind {
                ConflictKind::Headway => self.for_headway(conflict, snapshot, &mut actions),
                ConflictKind::Platform => self.for_platform(conflict, &mut actions),
                ConflictKind::Signal => self.for_signal(conflict, snapshot, &mut actions),
            }
        }
        actions
    }

    /// Hold the lower-precedence trains (freight and below) so the priority
    /// train clears the section.
    fn for_headway(
        &self,
        conflict: &ConflictPrediction,
        snapshot: &NetworkSnapshot,
        actions: &mut Vec<PrescriptiveAction>,
    ) {
        for train_id in &conflict.trains {
            let Some(obs) = snapshot.train(train_id) else {
                continue;
            };
            if obs.state.priority.ordinal() <= 2 {
                continue;
            }

            actions.push(PrescriptiveAction {
                id: format!("HOLD_{}_{}", train_id, conflict.id),
                kind: ActionKind::Hold {
                    duration_minutes: (conflict.estimated_delay_minutes * 1.5).min(10.0),
                },
                target_train: train_id.clone(),
                expected_benefit: format!(
                    "Prevent {:.1} min delay propagation",
                    conflict.estimated_delay_minutes
                ),
                confidence: conflict.probability,
                urgency: if conflict.severity == Severity::High {
                    Urgency::High
                } else {
                    Urgency::Medium
                },
            });
        }
    }

    /// Hold every occupant except the first (assumed highest-priority) until
    /// a platform frees up.
    fn for_platform(&self, conflict: &ConflictPrediction, actions: &mut Vec<PrescriptiveAction>) {
        for train_id in conflict.trains.iter().skip(1) {
            actions.push(PrescriptiveAction {
                id: format!("HOLD_PLATFORM_{train_id}"),
                kind: ActionKind::Hold {
                    duration_minutes: 5.0,
                },
                target_train: train_id.clone(),
                expected_benefit: "Prevent platform congestion".to_owned(),
                confidence: 0.8,
                urgency: Urgency::Medium,
            });
        }
    }

    /// Slow the approaching train to half its speed (floor 20 km/h) ahead of
    /// the RED signal.
    fn for_signal(
        &self,
        conflict: &ConflictPrediction,
        snapshot: &NetworkSnapshot,
        actions: &mut Vec<PrescriptiveAction>,
    ) {
        let Some(train_id) = conflict.trains.first() else {
            return;
        };
        let current_speed = snapshot
            .train(train_id)
            .map(|t| t.state.current_speed_kmh)
            .unwrap_or(0.0);

        actions.push(PrescriptiveAction {
            id: format!("SPEED_REDUCE_{}_{}", train_id, conflict.id),
            kind: ActionKind::SpeedChange {
                target_speed_kmh: (current_speed * 0.5).max(20.0),
            },
            target_train: train_id.clone(),
            expected_benefit: "Prevent emergency braking and ensure safe signal approach"
                .to_owned(),
            confidence: conflict.probability,
            urgency: Urgency::High,
        });
    }
}
