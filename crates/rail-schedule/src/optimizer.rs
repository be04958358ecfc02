//! The hybrid optimizer: constrained solve plus conflict-weighted refinement.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::ScheduleError;
use crate::problem::{Objective, Section, Train};
use crate::scorer::ConflictScorer;
use crate::solver::{ScheduleSolution, Scheduler, SolveStatus};

/// Default wall-clock budget for one solve.
pub const DEFAULT_SOLVE_BUDGET: Duration = Duration::from_secs(30);

/// Default planning horizon in minutes.
pub const DEFAULT_HORIZON_MINUTES: u32 = 60;

// ── Result types ──────────────────────────────────────────────────────────────

/// What one train should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrainAction {
    Proceed,
    Hold { minutes: u32 },
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendation {
    pub train_id: String,
    pub action: TrainAction,
    pub reason: String,
}

/// The typed outcome of one optimization call.  Solver failures surface as
/// `success = false` with an infinite objective, never as a panic or error —
/// the orchestrator can always degrade gracefully.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    pub success: bool,
    pub objective_value: f64,
    pub recommendations: Vec<Recommendation>,
    pub explanation: String,
    pub confidence: f32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub computation_time: Duration,
}

// ── HybridOptimizer ───────────────────────────────────────────────────────────

/// Runs the [`Scheduler`] under a hard wall-clock cap, maps its delay
/// assignment to per-train actions, then refines those actions with a
/// per-train conflict probability from the [`ConflictScorer`].
///
/// The solve runs on a dedicated worker thread; if it overruns the budget the
/// thread is abandoned (the built-in deadline makes it wind down on its own)
/// and the call degrades to a failed result.  Mid-solve cancellation beyond
/// the deadline is deliberately unsupported.
pub struct HybridOptimizer<S: Scheduler, C: ConflictScorer> {
    scheduler: Arc<S>,
    scorer: C,
    objective: Objective,
    horizon_minutes: u32,
    budget: Duration,
}

impl<S: Scheduler, C: ConflictScorer> HybridOptimizer<S, C> {
    pub fn new(scheduler: S, scorer: C, objective: Objective) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            scorer,
            objective,
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
            budget: DEFAULT_SOLVE_BUDGET,
        }
    }

    pub fn with_horizon(mut self, horizon_minutes: u32) -> Self {
        self.horizon_minutes = horizon_minutes;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Optimize hold/departure decisions for `trains` over `sections`.
    ///
    /// Every recommendation references a train from the input slice; the
    /// optimizer invents nothing.
    pub fn optimize(&self, trains: &[Train], sections: &[Section]) -> OptimizationResult {
        let started = Instant::now();
        info!(
            "optimizing schedule for {} trains over {} sections ({})",
            trains.len(),
            sections.len(),
            self.objective.as_str()
        );

        let solution = match self.solve_off_thread(trains, sections) {
            Ok(solution) => solution,
            Err(e) => {
                warn!("schedule solve failed: {e}");
                return Self::failed(e, started.elapsed());
            }
        };

        let mut recommendations = self.map_to_actions(trains, &solution);
        self.refine(trains, sections, &mut recommendations);

        let solver_confidence = match solution.status {
            SolveStatus::Optimal => 0.9,
            SolveStatus::Feasible => 0.7,
        };

        OptimizationResult {
            success: true,
            objective_value: solution.objective_value,
            explanation: format!(
                "schedule optimization for {} trains completed ({}, {:?})",
                trains.len(),
                self.objective.as_str(),
                solution.status,
            ),
            recommendations,
            confidence: (solver_confidence + 0.1_f32).min(0.95),
            computation_time: started.elapsed(),
        }
    }

    // ── Solve under the wall-clock cap ────────────────────────────────────

    fn solve_off_thread(
        &self,
        trains: &[Train],
        sections: &[Section],
    ) -> Result<ScheduleSolution, ScheduleError> {
        let scheduler = Arc::clone(&self.scheduler);
        let trains = trains.to_vec();
        let sections = sections.to_vec();
        let objective = self.objective;
        let horizon = self.horizon_minutes;
        let budget = self.budget;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = scheduler.solve(&trains, &sections, objective, horizon, budget);
            // The receiver may have given up already; that is fine.
            let _ = tx.send(result);
        });

        // Small grace on top of the solver's own deadline so a solver that
        // returns exactly at the cap still lands.
        match rx.recv_timeout(self.budget + Duration::from_millis(250)) {
            Ok(result) => result,
            Err(_) => Err(ScheduleError::Timeout(self.budget)),
        }
    }

    // ── Delay assignment → actions ────────────────────────────────────────

    fn map_to_actions(&self, trains: &[Train], solution: &ScheduleSolution) -> Vec<Recommendation> {
        trains
            .iter()
            .zip(&solution.delays)
            .map(|(train, &delay)| Recommendation {
                train_id: train.train_id.clone(),
                action: if delay > 0 {
                    TrainAction::Hold { minutes: delay }
                } else {
                    TrainAction::Proceed
                },
                reason: if delay > 0 {
                    format!("optimize {}", self.objective.as_str())
                } else {
                    "no delay required".to_owned()
                },
            })
            .collect()
    }

    // ── Conflict-weighted refinement ──────────────────────────────────────

    /// Second-guess the solver where the conflict picture disagrees with it:
    /// a high-risk train is not sent off on a green light, and a low-risk
    /// train does not sit out a long precautionary hold.
    fn refine(&self, trains: &[Train], sections: &[Section], recs: &mut [Recommendation]) {
        for (train, rec) in trains.iter().zip(recs.iter_mut()) {
            let conflict_prob = self.scorer.score(train, sections);

            if conflict_prob > 0.7 && rec.action == TrainAction::Proceed {
                rec.action = TrainAction::Hold {
                    minutes: ((conflict_prob * 15.0).round() as u32).max(5),
                };
                rec.reason = format!("elevated conflict risk ({conflict_prob:.2})");
            } else if conflict_prob < 0.3
                && let TrainAction::Hold { minutes } = rec.action
            {
                rec.action = TrainAction::Hold {
                    minutes: minutes.saturating_sub(5),
                };
                rec.reason = format!("hold shortened on low conflict risk ({conflict_prob:.2})");
            }
        }
    }

    fn failed(error: ScheduleError, computation_time: Duration) -> OptimizationResult {
        OptimizationResult {
            success: false,
            objective_value: f64::INFINITY,
            recommendations: vec![],
            explanation: format!("optimization failed: {error}"),
            confidence: 0.0,
            computation_time,
        }
    }
}
