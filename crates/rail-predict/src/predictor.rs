//! Conflict prediction over a state snapshot.
//!
//! Three independent scans — headway, platform, signal-approach — run over
//! one [`NetworkSnapshot`] and their results are concatenated without
//! deduplication.  The scans never fail: missing or unresolved fields are
//! treated as zero/unknown and the cycle continues, trading completeness for
//! availability.

use rail_core::{Aspect, NodeId, Severity};
use rail_state::{NetworkSnapshot, TrainObs};
use rail_topology::RailNetwork;

use crate::conflict::{ConflictKind, ConflictPrediction, ConflictSite};

#[cfg(feature = "fx-hash")]
type GroupMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type GroupMap<K, V> = std::collections::HashMap<K, V>;

/// Platform capacity assumed for every station.
const PLATFORM_CAPACITY: usize = 2;

/// Speed difference (km/h) above which a following train is considered to be
/// closing on the one ahead.
const HEADWAY_SPEED_DIFF_KMH: f32 = 10.0;

/// Scans the current snapshot for the three conflict classes and scores each
/// by probability and severity.
pub struct ConflictPredictor {
    /// Prediction horizon in minutes.  Carried for parity with the analysis
    /// cadence configuration; the current scans are horizon-independent.
    pub horizon_minutes: u32,
}

impl Default for ConflictPredictor {
    fn default() -> Self {
        Self { horizon_minutes: 30 }
    }
}

impl ConflictPredictor {
    pub fn new(horizon_minutes: u32) -> Self {
        Self { horizon_minutes }
    }

    /// Run all three scans.  Every returned prediction references only train
    /// ids present in `snapshot`.
    pub fn predict(
        &self,
        snapshot: &NetworkSnapshot,
        network: &RailNetwork,
    ) -> Vec<ConflictPrediction> {
        let mut out = self.headway_conflicts(snapshot);
        out.extend(self.platform_conflicts(snapshot, network));
        out.extend(self.signal_conflicts(snapshot, network));
        out
    }

    // ── Headway ───────────────────────────────────────────────────────────

    /// Trains sharing a node, where a faster one is closing on a slower one.
    ///
    /// Trains whose node could not be resolved (`NodeId::INVALID`) form a
    /// group of their own and are still compared — a train with an unknown
    /// position is more worrying, not less.
    fn headway_conflicts(&self, snapshot: &NetworkSnapshot) -> Vec<ConflictPrediction> {
        let mut conflicts = Vec::new();

        for (node, mut group) in group_by_node(&snapshot.trains, |_| true) {
            if group.len() < 2 {
                continue;
            }
            // Fastest first, so each adjacent pair is (faster, slower).
            group.sort_by(|a, b| {
                b.state
                    .current_speed_kmh
                    .total_cmp(&a.state.current_speed_kmh)
            });

            for pair in group.windows(2) {
                let (fast, slow) = (pair[0], pair[1]);
                let speed_diff = fast.state.current_speed_kmh - slow.state.current_speed_kmh;
                if speed_diff <= HEADWAY_SPEED_DIFF_KMH {
                    continue;
                }

                let time_to_conflict_s = 300.0 / speed_diff.max(1.0);
                let probability = (speed_diff / 30.0).min(0.9);

                conflicts.push(ConflictPrediction {
                    id: format!("HEADWAY_{}_{}", fast.train_id, slow.train_id),
                    kind: ConflictKind::Headway,
                    trains: vec![fast.train_id.clone(), slow.train_id.clone()],
                    site: ConflictSite::Node(node),
                    predicted_at: snapshot
                        .taken_at
                        .offset_secs(time_to_conflict_s.round() as i64),
                    probability,
                    severity: if probability > 0.7 {
                        Severity::High
                    } else {
                        Severity::Medium
                    },
                    estimated_delay_minutes: (speed_diff * 0.2).max(2.0),
                });
            }
        }

        conflicts
    }

    // ── Platform ──────────────────────────────────────────────────────────

    /// Stations holding more trains than their platforms can take.
    fn platform_conflicts(
        &self,
        snapshot: &NetworkSnapshot,
        network: &RailNetwork,
    ) -> Vec<ConflictPrediction> {
        let mut conflicts = Vec::new();

        let at_stations = group_by_node(&snapshot.trains, |t| {
            network.is_station(t.state.current_node)
        });

        for (station, group) in at_stations {
            if group.len() <= PLATFORM_CAPACITY {
                continue;
            }
            conflicts.push(ConflictPrediction {
                id: format!("PLATFORM_{}_{}", network.name_of(station), group.len()),
                kind: ConflictKind::Platform,
                trains: group.iter().map(|t| t.train_id.clone()).collect(),
                site: ConflictSite::Node(station),
                predicted_at: snapshot.taken_at.offset_mins(5),
                probability: 0.8,
                severity: Severity::High,
                estimated_delay_minutes: 5.0 * (group.len() - PLATFORM_CAPACITY) as f32,
            });
        }

        conflicts
    }

    // ── Signal ────────────────────────────────────────────────────────────

    /// Trains running at speed towards a RED signal.
    ///
    /// "Approaching" is a blanket approximation: any train moving above
    /// 10 km/h that is not standing at a station counts, without geometric
    /// filtering to the specific signal.
    fn signal_conflicts(
        &self,
        snapshot: &NetworkSnapshot,
        network: &RailNetwork,
    ) -> Vec<ConflictPrediction> {
        let mut conflicts = Vec::new();

        let approaching: Vec<&TrainObs> = snapshot
            .trains
            .iter()
            .filter(|t| {
                t.state.current_speed_kmh > 10.0 && !network.is_station(t.state.current_node)
            })
            .collect();

        for signal in snapshot.signals.iter().filter(|s| s.aspect == Aspect::Red) {
            for train in &approaching {
                let speed = train.state.current_speed_kmh;
                if speed <= 20.0 {
                    continue;
                }

                let braking_time_s = speed / 20.0;
                conflicts.push(ConflictPrediction {
                    id: format!(
                        "SIGNAL_{}_{}",
                        network.signal_name_of(signal.signal),
                        train.train_id
                    ),
                    kind: ConflictKind::Signal,
                    trains: vec![train.train_id.clone()],
                    site: ConflictSite::Signal(signal.signal),
                    predicted_at: snapshot.taken_at.offset_secs(braking_time_s.round() as i64),
                    probability: if speed > 40.0 { 0.6 } else { 0.3 },
                    severity: if speed > 60.0 {
                        Severity::High
                    } else {
                        Severity::Medium
                    },
                    estimated_delay_minutes: (braking_time_s / 30.0).max(1.0),
                });
            }
        }

        conflicts
    }
}

// ── Grouping helper ───────────────────────────────────────────────────────────

/// Group trains by `current_node` in first-seen order (snapshot order is
/// sorted by train id, so the grouping is deterministic).
fn group_by_node<'a>(
    trains: &'a [TrainObs],
    keep: impl Fn(&TrainObs) -> bool,
) -> Vec<(NodeId, Vec<&'a TrainObs>)> {
    let mut index: GroupMap<NodeId, usize> = GroupMap::default();
    let mut groups: Vec<(NodeId, Vec<&TrainObs>)> = Vec::new();

    for train in trains.iter().filter(|t| keep(t)) {
        let node = train.state.current_node;
        match index.get(&node) {
            Some(&i) => groups[i].1.push(train),
            None => {
                index.insert(node, groups.len());
                groups.push((node, vec![train]));
            }
        }
    }
    groups
}
