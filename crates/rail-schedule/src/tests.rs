//! Unit tests for rail-schedule.

mod helpers {
    use rail_core::{Timestamp, TrainPriority};

    use crate::problem::{Section, Train};

    pub fn train(id: &str, priority: TrainPriority, km: f32) -> Train {
        Train {
            train_id: id.to_owned(),
            number: id.to_owned(),
            train_type: priority.as_str().to_owned(),
            priority,
            current_km: km,
            destination_km: km + 50.0,
            scheduled_arrival: Timestamp(3_600),
            actual_arrival: None,
            current_speed_kmh: 0.0,
            max_speed_kmh: 100.0,
        }
    }

    pub fn late_train(id: &str, priority: TrainPriority, km: f32, late_mins: i64) -> Train {
        Train {
            actual_arrival: Some(Timestamp(3_600).offset_mins(late_mins)),
            ..train(id, priority, km)
        }
    }

    pub fn section(id: &str, start_km: f32, end_km: f32, capacity: u32) -> Section {
        Section {
            section_id: id.to_owned(),
            start_km,
            end_km,
            speed_kmh: 100.0,
            capacity,
            occupants: vec![],
        }
    }
}

// ── Fixpoint solver ───────────────────────────────────────────────────────────

mod solver {
    use std::time::Duration;

    use rail_core::TrainPriority;

    use crate::solver::{FixpointScheduler, Scheduler, SolveStatus};
    use crate::{Objective, ScheduleError};

    use super::helpers::{section, train};

    const DEADLINE: Duration = Duration::from_secs(30);

    #[test]
    fn unconstrained_trains_all_proceed() {
        let trains = vec![
            train("T001", TrainPriority::Passenger, 100.0),
            train("T002", TrainPriority::Passenger, 200.0),
        ];
        let sections = vec![
            section("SEC001", 90.0, 120.0, 2),
            section("SEC002", 190.0, 220.0, 2),
        ];

        let s = FixpointScheduler
            .solve(&trains, &sections, Objective::MinimizeDelay, 60, DEADLINE)
            .unwrap();

        assert_eq!(s.status, SolveStatus::Optimal);
        assert_eq!(s.delays, vec![0, 0]);
        assert_eq!(s.objective_value, 0.0);
    }

    #[test]
    fn separation_holds_the_lower_priority_train() {
        let trains = vec![
            train("FRT", TrainPriority::Freight, 105.0),
            train("EXP", TrainPriority::MailExpress, 110.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 5)];

        let s = FixpointScheduler
            .solve(&trains, &sections, Objective::MinimizeDelay, 60, DEADLINE)
            .unwrap();

        // The express proceeds; the freight waits out the minimum headway.
        assert_eq!(s.delays, vec![5, 0]);
    }

    #[test]
    fn capacity_and_separation_compose() {
        // Three same-priority trains in a capacity-2 section: separation
        // chains 0/5/10 and the capacity floor of 10 binds the third.
        let trains = vec![
            train("T001", TrainPriority::Passenger, 100.0),
            train("T002", TrainPriority::Passenger, 105.0),
            train("T003", TrainPriority::Passenger, 110.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let s = FixpointScheduler
            .solve(&trains, &sections, Objective::MinimizeDelay, 60, DEADLINE)
            .unwrap();

        assert_eq!(s.status, SolveStatus::Optimal);
        assert_eq!(s.delays, vec![0, 5, 10]);
        assert_eq!(s.objective_value, 15.0);
    }

    #[test]
    fn capacity_floor_binds_beyond_separation() {
        // Two trains, capacity 1: the second gets the capacity hold (10),
        // which exceeds the 5-minute separation bound.
        let trains = vec![
            train("T001", TrainPriority::Passenger, 100.0),
            train("T002", TrainPriority::Passenger, 101.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 1)];

        let s = FixpointScheduler
            .solve(&trains, &sections, Objective::MinimizeDelay, 60, DEADLINE)
            .unwrap();

        assert_eq!(s.delays, vec![0, 10]);
    }

    #[test]
    fn throughput_objective_reports_max_delay() {
        let trains = vec![
            train("T001", TrainPriority::Passenger, 100.0),
            train("T002", TrainPriority::Passenger, 105.0),
            train("T003", TrainPriority::Passenger, 110.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let s = FixpointScheduler
            .solve(
                &trains,
                &sections,
                Objective::MaximizeThroughput,
                60,
                DEADLINE,
            )
            .unwrap();

        // Same least-fixpoint delays, different objective accounting.
        assert_eq!(s.delays, vec![0, 5, 10]);
        assert_eq!(s.objective_value, 10.0);
    }

    #[test]
    fn idempotent_when_optimal() {
        let trains = vec![
            train("T001", TrainPriority::MailExpress, 100.0),
            train("T002", TrainPriority::Passenger, 105.0),
            train("T003", TrainPriority::Freight, 108.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let a = FixpointScheduler
            .solve(&trains, &sections, Objective::MinimizeDelay, 60, DEADLINE)
            .unwrap();
        let b = FixpointScheduler
            .solve(&trains, &sections, Objective::MinimizeDelay, 60, DEADLINE)
            .unwrap();

        assert_eq!(a.status, SolveStatus::Optimal);
        assert_eq!(a.delays, b.delays);
        assert_eq!(a.objective_value, b.objective_value);
    }

    #[test]
    fn infeasible_when_chain_exceeds_horizon() {
        let trains = vec![
            train("T001", TrainPriority::Passenger, 100.0),
            train("T002", TrainPriority::Passenger, 105.0),
            train("T003", TrainPriority::Passenger, 110.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        // The third train needs 10 minutes; a 7-minute horizon cannot host it.
        let result =
            FixpointScheduler.solve(&trains, &sections, Objective::MinimizeDelay, 7, DEADLINE);
        assert!(matches!(
            result,
            Err(ScheduleError::Infeasible { ref train_id, .. }) if train_id == "T003"
        ));
    }
}

// ── Scorers ───────────────────────────────────────────────────────────────────

mod scorer {
    use rail_core::TrainPriority;

    use crate::scorer::{ConflictScorer, HeuristicScorer, LearnedScorer};

    use super::helpers::{late_train, section, train};

    #[test]
    fn heuristic_on_time_empty_section_is_zero() {
        let t = train("T001", TrainPriority::Passenger, 100.0);
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];
        assert_eq!(HeuristicScorer.score(&t, &sections), 0.0);
    }

    #[test]
    fn heuristic_averages_delay_and_occupancy() {
        // 15 min late → delay factor 0.5; occupancy 1/2 → 0.5; mean 0.5.
        let t = late_train("T001", TrainPriority::Passenger, 100.0, 15);
        let mut s = section("SEC001", 90.0, 120.0, 2);
        s.occupants = vec!["T001".to_owned()];
        assert_eq!(HeuristicScorer.score(&t, &[s]), 0.5);
    }

    #[test]
    fn heuristic_clamps_at_one() {
        // 90 min late (factor capped at 1.0) and 3 occupants on capacity 1.
        let t = late_train("T001", TrainPriority::Freight, 100.0, 90);
        let mut s = section("SEC001", 90.0, 120.0, 1);
        s.occupants = vec!["A".into(), "B".into(), "C".into()];
        assert_eq!(HeuristicScorer.score(&t, &[s]), 1.0);
    }

    #[test]
    fn heuristic_outside_any_section_uses_delay_only() {
        let t = late_train("T001", TrainPriority::Passenger, 500.0, 30);
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];
        // delay factor 1.0, occupancy 0 → 0.5
        assert_eq!(HeuristicScorer.score(&t, &sections), 0.5);
    }

    #[test]
    fn learned_scorer_is_monotone_in_lateness() {
        let scorer = LearnedScorer::from_weights(-2.0, 4.0, 1.0);
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let on_time = scorer.score(&train("T001", TrainPriority::Passenger, 100.0), &sections);
        let late = scorer.score(
            &late_train("T002", TrainPriority::Passenger, 100.0, 30),
            &sections,
        );

        assert!((0.0..=1.0).contains(&on_time));
        assert!((0.0..=1.0).contains(&late));
        assert!(late > on_time);
    }
}

// ── Hybrid optimizer ──────────────────────────────────────────────────────────

mod optimizer {
    use std::time::Duration;

    use rail_core::TrainPriority;

    use crate::scorer::ConflictScorer;
    use crate::solver::FixpointScheduler;
    use crate::{
        HeuristicScorer, HybridOptimizer, Objective, ScheduleError, ScheduleResult,
        ScheduleSolution, Scheduler, Section, Train, TrainAction,
    };

    use super::helpers::{section, train};

    /// Scorer returning a fixed probability, for exercising the refinement
    /// thresholds precisely.
    struct FixedScorer(f32);

    impl ConflictScorer for FixedScorer {
        fn score(&self, _train: &Train, _sections: &[Section]) -> f32 {
            self.0
        }
    }

    /// Scheduler that always fails, for the degraded path.
    struct FailingScheduler;

    impl Scheduler for FailingScheduler {
        fn solve(
            &self,
            _trains: &[Train],
            _sections: &[Section],
            _objective: Objective,
            _horizon_minutes: u32,
            deadline: Duration,
        ) -> ScheduleResult<ScheduleSolution> {
            Err(ScheduleError::Timeout(deadline))
        }
    }

    /// Scheduler that never answers within any reasonable budget.
    struct StallingScheduler;

    impl Scheduler for StallingScheduler {
        fn solve(
            &self,
            _trains: &[Train],
            _sections: &[Section],
            _objective: Objective,
            _horizon_minutes: u32,
            _deadline: Duration,
        ) -> ScheduleResult<ScheduleSolution> {
            std::thread::sleep(Duration::from_secs(5));
            Ok(ScheduleSolution {
                status: crate::SolveStatus::Optimal,
                delays: vec![],
                objective_value: 0.0,
            })
        }
    }

    #[test]
    fn maps_delays_to_proceed_and_hold() {
        let trains = vec![
            train("EXP", TrainPriority::MailExpress, 100.0),
            train("FRT", TrainPriority::Freight, 105.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 5)];

        let optimizer = HybridOptimizer::new(
            FixpointScheduler,
            FixedScorer(0.5), // mid-range: refinement leaves actions alone
            Objective::MinimizeDelay,
        );
        let result = optimizer.optimize(&trains, &sections);

        assert!(result.success);
        assert_eq!(result.confidence, 0.95); // min(0.95, 0.9 + 0.1)
        assert_eq!(result.recommendations.len(), 2);

        let exp = &result.recommendations[0];
        assert_eq!(exp.action, TrainAction::Proceed);
        let frt = &result.recommendations[1];
        assert_eq!(frt.action, TrainAction::Hold { minutes: 5 });
        assert!(frt.reason.contains("minimize_total_delay"));
    }

    #[test]
    fn refinement_converts_risky_proceed_to_hold() {
        let trains = vec![train("T001", TrainPriority::Passenger, 100.0)];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let optimizer = HybridOptimizer::new(
            FixpointScheduler,
            FixedScorer(0.85),
            Objective::MinimizeDelay,
        );
        let result = optimizer.optimize(&trains, &sections);

        // max(5, round(0.85 * 15)) = 13
        assert_eq!(
            result.recommendations[0].action,
            TrainAction::Hold { minutes: 13 }
        );
        assert!(result.recommendations[0].reason.contains("0.85"));
    }

    #[test]
    fn refinement_shortens_low_risk_holds() {
        // Capacity 1 forces a 10-minute hold on the second train; a low
        // conflict probability shaves 5 minutes off it.
        let trains = vec![
            train("T001", TrainPriority::Passenger, 100.0),
            train("T002", TrainPriority::Passenger, 101.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 1)];

        let optimizer = HybridOptimizer::new(
            FixpointScheduler,
            FixedScorer(0.1),
            Objective::MinimizeDelay,
        );
        let result = optimizer.optimize(&trains, &sections);

        assert_eq!(
            result.recommendations[1].action,
            TrainAction::Hold { minutes: 5 }
        );
    }

    #[test]
    fn refinement_floors_hold_at_zero() {
        let trains = vec![
            train("FRT", TrainPriority::Freight, 105.0),
            train("EXP", TrainPriority::MailExpress, 110.0),
        ];
        let sections = vec![section("SEC001", 90.0, 120.0, 5)];

        let optimizer = HybridOptimizer::new(
            FixpointScheduler,
            FixedScorer(0.1),
            Objective::MinimizeDelay,
        );
        let result = optimizer.optimize(&trains, &sections);

        // The freight's 5-minute headway hold shrinks to a zero-minute hold.
        assert_eq!(
            result.recommendations[0].action,
            TrainAction::Hold { minutes: 0 }
        );
    }

    #[test]
    fn solver_failure_degrades_to_failed_result() {
        let trains = vec![train("T001", TrainPriority::Passenger, 100.0)];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let optimizer = HybridOptimizer::new(
            FailingScheduler,
            HeuristicScorer,
            Objective::MinimizeDelay,
        );
        let result = optimizer.optimize(&trains, &sections);

        assert!(!result.success);
        assert_eq!(result.objective_value, f64::INFINITY);
        assert!(result.recommendations.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn wall_clock_cap_abandons_a_stalled_solve() {
        let trains = vec![train("T001", TrainPriority::Passenger, 100.0)];
        let sections = vec![section("SEC001", 90.0, 120.0, 2)];

        let optimizer = HybridOptimizer::new(
            StallingScheduler,
            HeuristicScorer,
            Objective::MinimizeDelay,
        )
        .with_budget(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let result = optimizer.optimize(&trains, &sections);

        assert!(!result.success);
        // Returned at the cap, not after the solver's 5-second stall.
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
