//! Unit tests for rail-predict.
//!
//! All tests use a hand-built snapshot over a two-station section so they
//! run without a feed or a store.

mod helpers {
    use rail_core::{Aspect, NodeId, NodeKind, SignalId, SignalKind, Timestamp, TrainPriority};
    use rail_state::{NetworkSnapshot, SignalObs, TrainObs, TrainState};
    use rail_topology::{RailNetwork, RailNetworkBuilder, TrackSpec};

    /// STN_A — SIG_001 — STN_B with one signal at the middle node.
    pub fn section() -> RailNetwork {
        let mut b = RailNetworkBuilder::new();
        let a = b.add_station("STN_A", 100.0, None, None);
        let s = b.add_node("SIG_001", NodeKind::Signal, 105.0);
        let c = b.add_station("STN_B", 110.0, None, None);
        b.add_double_track(a, s, TrackSpec::flat(5_000.0));
        b.add_double_track(s, c, TrackSpec::flat(5_000.0));
        b.add_signal("SIG_001", s, SignalKind::Home);
        b.build()
    }

    pub fn obs(train_id: &str, node: NodeId, speed: f32, priority: TrainPriority) -> TrainObs {
        let mut state = TrainState::at_node(node, priority, Timestamp(1_000));
        state.current_speed_kmh = speed;
        TrainObs {
            train_id: train_id.to_owned(),
            state,
        }
    }

    pub fn snapshot(mut trains: Vec<TrainObs>, signals: Vec<(SignalId, Aspect)>) -> NetworkSnapshot {
        trains.sort_by(|a, b| a.train_id.cmp(&b.train_id));
        NetworkSnapshot {
            taken_at: Timestamp(1_000),
            trains,
            signals: signals
                .into_iter()
                .map(|(signal, aspect)| SignalObs { signal, aspect })
                .collect(),
            blocks: vec![],
        }
    }
}

// ── Headway scan ──────────────────────────────────────────────────────────────

mod headway {
    use rail_core::{Severity, TrainPriority};

    use crate::{ConflictKind, ConflictPredictor};

    use super::helpers::{obs, section, snapshot};

    #[test]
    fn probability_clamps_at_point_nine() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", node, 60.0, TrainPriority::MailExpress),
                obs("T002", node, 30.0, TrainPriority::Passenger),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let headway: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::Headway)
            .collect();

        assert_eq!(headway.len(), 1);
        let c = headway[0];
        assert_eq!(c.probability, 0.9); // min(0.9, 30/30)
        assert_eq!(c.severity, Severity::High);
        assert_eq!(c.trains, vec!["T001", "T002"]); // fast first
        assert_eq!(c.estimated_delay_minutes, 6.0); // max(2, 30*0.2)
        assert_eq!(c.id, "HEADWAY_T001_T002");
    }

    #[test]
    fn small_speed_difference_is_ignored() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", node, 50.0, TrainPriority::Passenger),
                obs("T002", node, 45.0, TrainPriority::Passenger),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert!(conflicts.iter().all(|c| c.kind != ConflictKind::Headway));
    }

    #[test]
    fn adjacent_pairs_only() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", node, 80.0, TrainPriority::Passenger),
                obs("T002", node, 50.0, TrainPriority::Passenger),
                obs("T003", node, 20.0, TrainPriority::Freight),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let ids: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::Headway)
            .map(|c| c.id.as_str())
            .collect();

        // (80,50) and (50,20); never the non-adjacent (80,20).
        assert_eq!(ids, vec!["HEADWAY_T001_T002", "HEADWAY_T002_T003"]);
    }

    #[test]
    fn moderate_diff_is_medium_severity() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        // diff 15 → probability 0.5 → MEDIUM
        let snap = snapshot(
            vec![
                obs("T001", node, 40.0, TrainPriority::Passenger),
                obs("T002", node, 25.0, TrainPriority::Passenger),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].probability, 0.5);
        assert_eq!(conflicts[0].severity, Severity::Medium);
    }
}

// ── Platform scan ─────────────────────────────────────────────────────────────

mod platform {
    use rail_core::{Severity, TrainPriority};

    use crate::{ConflictKind, ConflictPredictor};

    use super::helpers::{obs, section, snapshot};

    #[test]
    fn three_trains_is_one_conflict() {
        let net = section();
        let stn = net.node_id("STN_A").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", stn, 0.0, TrainPriority::MailExpress),
                obs("T002", stn, 0.0, TrainPriority::Passenger),
                obs("T003", stn, 0.0, TrainPriority::Freight),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let platform: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::Platform)
            .collect();

        assert_eq!(platform.len(), 1);
        let c = platform[0];
        assert_eq!(c.estimated_delay_minutes, 5.0); // 5 * (3 - 2)
        assert_eq!(c.probability, 0.8);
        assert_eq!(c.severity, Severity::High);
        assert_eq!(c.trains.len(), 3);
        assert_eq!(c.predicted_at, snap.taken_at.offset_mins(5));
    }

    #[test]
    fn two_trains_fit_the_platforms() {
        let net = section();
        let stn = net.node_id("STN_A").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", stn, 0.0, TrainPriority::Passenger),
                obs("T002", stn, 0.0, TrainPriority::Passenger),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert!(conflicts.iter().all(|c| c.kind != ConflictKind::Platform));
    }

    #[test]
    fn four_trains_scale_the_delay() {
        let net = section();
        let stn = net.node_id("STN_B").unwrap();
        let snap = snapshot(
            (1..=4)
                .map(|i| obs(&format!("T00{i}"), stn, 0.0, TrainPriority::Passenger))
                .collect(),
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let c = conflicts
            .iter()
            .find(|c| c.kind == ConflictKind::Platform)
            .unwrap();
        assert_eq!(c.estimated_delay_minutes, 10.0); // 5 * (4 - 2)
    }
}

// ── Signal scan ───────────────────────────────────────────────────────────────

mod signal {
    use rail_core::{Aspect, Severity, TrainPriority};

    use crate::{ConflictKind, ConflictPredictor};

    use super::helpers::{obs, section, snapshot};

    #[test]
    fn red_signal_with_approach_at_45() {
        let net = section();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![obs("T001", mid, 45.0, TrainPriority::Passenger)],
            vec![(sig, Aspect::Red)],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let signal: Vec<_> = conflicts
            .iter()
            .filter(|c| c.kind == ConflictKind::Signal)
            .collect();

        assert_eq!(signal.len(), 1);
        let c = signal[0];
        assert_eq!(c.probability, 0.6); // 45 > 40
        assert_eq!(c.severity, Severity::Medium); // 45 <= 60
        assert_eq!(c.estimated_delay_minutes, 1.0); // max(1, 2.25/30)
        assert_eq!(c.id, "SIGNAL_SIG_001_T001");
    }

    #[test]
    fn fast_approach_is_high_severity() {
        let net = section();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![obs("T001", mid, 75.0, TrainPriority::Passenger)],
            vec![(sig, Aspect::Red)],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let c = conflicts
            .iter()
            .find(|c| c.kind == ConflictKind::Signal)
            .unwrap();
        assert_eq!(c.probability, 0.6);
        assert_eq!(c.severity, Severity::High); // 75 > 60
    }

    #[test]
    fn slow_approach_is_low_probability() {
        let net = section();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![obs("T001", mid, 35.0, TrainPriority::Passenger)],
            vec![(sig, Aspect::Red)],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let c = conflicts
            .iter()
            .find(|c| c.kind == ConflictKind::Signal)
            .unwrap();
        assert_eq!(c.probability, 0.3); // 35 <= 40
    }

    #[test]
    fn station_dwellers_and_crawlers_excluded() {
        let net = section();
        let stn = net.node_id("STN_A").unwrap();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![
                // At a station: not approaching, whatever the speed.
                obs("T001", stn, 80.0, TrainPriority::Passenger),
                // Above the 10 km/h approach threshold but at or below the
                // 20 km/h conflict threshold: observed, no conflict.
                obs("T002", mid, 18.0, TrainPriority::Passenger),
            ],
            vec![(sig, Aspect::Red)],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert!(conflicts.iter().all(|c| c.kind != ConflictKind::Signal));
    }

    #[test]
    fn green_signal_is_quiet() {
        let net = section();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![obs("T001", mid, 90.0, TrainPriority::Passenger)],
            vec![(sig, Aspect::Green)],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert!(conflicts.iter().all(|c| c.kind != ConflictKind::Signal));
    }
}

// ── Prescriptive mapper ───────────────────────────────────────────────────────

mod mapper {
    use rail_core::{Aspect, TrainPriority, Urgency};

    use crate::{ActionKind, ConflictKind, ConflictPredictor, PrescriptiveMapper};

    use super::helpers::{obs, section, snapshot};

    #[test]
    fn headway_holds_only_low_precedence_trains() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", node, 60.0, TrainPriority::Passenger),
                obs("T002", node, 30.0, TrainPriority::Freight),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let actions = PrescriptiveMapper.recommend(&conflicts, &snap);

        // Only the freight train is held; the passenger train proceeds.
        assert_eq!(actions.len(), 1);
        let a = &actions[0];
        assert_eq!(a.target_train, "T002");
        assert_eq!(
            a.kind,
            ActionKind::Hold {
                duration_minutes: 9.0 // min(10, 6.0 * 1.5)
            }
        );
        assert_eq!(a.confidence, 0.9);
        assert_eq!(a.urgency, Urgency::High);
    }

    #[test]
    fn below_threshold_conflicts_are_not_acted_on() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        // diff 12 → probability 0.4 < 0.5
        let snap = snapshot(
            vec![
                obs("T001", node, 40.0, TrainPriority::Freight),
                obs("T002", node, 28.0, TrainPriority::Freight),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert_eq!(conflicts.len(), 1);
        assert!(PrescriptiveMapper.recommend(&conflicts, &snap).is_empty());
    }

    #[test]
    fn platform_holds_all_but_the_first_occupant() {
        let net = section();
        let stn = net.node_id("STN_A").unwrap();
        let snap = snapshot(
            vec![
                obs("T001", stn, 0.0, TrainPriority::MailExpress),
                obs("T002", stn, 0.0, TrainPriority::Passenger),
                obs("T003", stn, 0.0, TrainPriority::Freight),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let actions = PrescriptiveMapper.recommend(&conflicts, &snap);

        let held: Vec<_> = actions.iter().map(|a| a.target_train.as_str()).collect();
        assert_eq!(held, vec!["T002", "T003"]);
        for a in &actions {
            assert_eq!(
                a.kind,
                ActionKind::Hold {
                    duration_minutes: 5.0
                }
            );
            assert_eq!(a.confidence, 0.8);
            assert_eq!(a.urgency, Urgency::Medium);
        }
    }

    #[test]
    fn signal_conflict_halves_the_speed() {
        let net = section();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![obs("T001", mid, 45.0, TrainPriority::Passenger)],
            vec![(sig, Aspect::Red)],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let actions = PrescriptiveMapper.recommend(&conflicts, &snap);

        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].kind,
            ActionKind::SpeedChange {
                target_speed_kmh: 22.5
            }
        );
        assert_eq!(actions[0].urgency, Urgency::High);
    }

    #[test]
    fn speed_change_floors_at_twenty() {
        let net = section();
        let mid = net.node_id("SIG_001").unwrap();
        let sig = net.signal_id("SIG_001").unwrap();
        let snap = snapshot(
            vec![obs("T001", mid, 30.0, TrainPriority::Passenger)],
            vec![(sig, Aspect::Red)],
        );

        // probability 0.3 — below threshold, so force the conflict through
        // by crafting it at higher probability.
        let mut conflicts = ConflictPredictor::default().predict(&snap, &net);
        assert_eq!(conflicts.len(), 1);
        conflicts[0].probability = 0.6;

        let actions = PrescriptiveMapper.recommend(&conflicts, &snap);
        assert_eq!(
            actions[0].kind,
            ActionKind::SpeedChange {
                target_speed_kmh: 20.0 // max(20, 30 * 0.5)
            }
        );
    }

    #[test]
    fn higher_ranked_conflicts_emit_first() {
        let net = section();
        let node = net.node_id("SIG_001").unwrap();
        let stn = net.node_id("STN_A").unwrap();
        let snap = snapshot(
            vec![
                // Headway pair at the signal: probability 0.9, HIGH → score 2.7.
                obs("T001", node, 60.0, TrainPriority::Freight),
                obs("T002", node, 30.0, TrainPriority::Freight),
                // Platform crowd: probability 0.8, HIGH → score 2.4.
                obs("T010", stn, 0.0, TrainPriority::Passenger),
                obs("T011", stn, 0.0, TrainPriority::Passenger),
                obs("T012", stn, 0.0, TrainPriority::Passenger),
            ],
            vec![],
        );

        let conflicts = ConflictPredictor::default().predict(&snap, &net);
        let actions = PrescriptiveMapper.recommend(&conflicts, &snap);

        // Headway holds (both freight trains) come before platform holds.
        let targets: Vec<_> = actions.iter().map(|a| a.target_train.as_str()).collect();
        assert_eq!(targets, vec!["T001", "T002", "T011", "T012"]);
    }
}
