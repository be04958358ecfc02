//! The `Scheduler` capability and the default fixpoint solver.
//!
//! The contract is one method: solve a (trains, sections, objective) problem
//! under a deadline.  The solving technology behind it — constraint
//! propagation here, CP/MILP/local search elsewhere — is an implementation
//! choice, not part of the contract.

use std::time::{Duration, Instant};

use crate::error::{ScheduleError, ScheduleResult};
use crate::problem::{Objective, Section, Train};

/// Minimum headway between trains sharing a section, in minutes.
pub const MIN_HEADWAY_MINUTES: u32 = 5;

/// Hold imposed on each train beyond a section's capacity, in minutes.
pub const CAPACITY_HOLD_MINUTES: u32 = 10;

// ── Solution ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The solver converged; the delay assignment is minimal for the
    /// constraint system (optimal under either objective).
    Optimal,
    /// The deadline expired with a feasible but possibly non-minimal
    /// assignment in hand.
    Feasible,
}

#[derive(Debug, Clone)]
pub struct ScheduleSolution {
    pub status: SolveStatus,
    /// Hold/departure delay per train, aligned with the input slice.
    pub delays: Vec<u32>,
    pub objective_value: f64,
}

// ── Scheduler trait ───────────────────────────────────────────────────────────

/// Pluggable solving capability.
///
/// `Send + Sync + 'static` so the optimizer can run a solve on a dedicated
/// worker thread and abandon it when the wall-clock budget expires.
pub trait Scheduler: Send + Sync + 'static {
    fn solve(
        &self,
        trains: &[Train],
        sections: &[Section],
        objective: Objective,
        horizon_minutes: u32,
        deadline: Duration,
    ) -> ScheduleResult<ScheduleSolution>;
}

// ── FixpointScheduler ─────────────────────────────────────────────────────────

/// Deterministic least-fixpoint propagation over the lower-bound constraint
/// system.
///
/// Both constraint classes only ever push a delay **up**:
///
/// - capacity: each occupant beyond a section's capacity (in input order)
///   needs `delay ≥ 10`;
/// - separation: for every same-section pair, the lower-priority train needs
///   `delay ≥ higher-priority delay + 5`.
///
/// Iterating to the least fixpoint therefore yields the componentwise-minimal
/// feasible assignment, which minimizes the delay sum and the delay maximum
/// simultaneously — convergence is `Optimal` for either objective.  The same
/// input always produces the same assignment.
pub struct FixpointScheduler;

impl Scheduler for FixpointScheduler {
    fn solve(
        &self,
        trains: &[Train],
        sections: &[Section],
        objective: Objective,
        horizon_minutes: u32,
        deadline: Duration,
    ) -> ScheduleResult<ScheduleSolution> {
        let started = Instant::now();
        let n = trains.len();
        let mut delays = vec![0u32; n];

        // ── Capacity floors ───────────────────────────────────────────────
        for section in sections {
            let members: Vec<usize> = (0..n)
                .filter(|&i| section.contains(trains[i].current_km))
                .collect();
            if members.len() > section.capacity as usize {
                for &i in &members[section.capacity as usize..] {
                    delays[i] = delays[i].max(CAPACITY_HOLD_MINUTES);
                }
            }
        }

        // ── Separation constraints ────────────────────────────────────────
        //
        // Trains in precedence order (stable on input order within a class);
        // each same-section pair constrains the later train after the
        // earlier one.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| trains[i].priority.ordinal());

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for a in 0..order.len() {
            for b in (a + 1)..order.len() {
                let (i, j) = (order[a], order[b]);
                if shares_section(&trains[i], &trains[j], sections) {
                    pairs.push((i, j));
                }
            }
        }

        // ── Propagate to the least fixpoint ───────────────────────────────
        let mut status = SolveStatus::Optimal;
        for _pass in 0..=n {
            if started.elapsed() > deadline {
                // Out of budget: hand back the current assignment if it
                // already satisfies everything, otherwise give up.
                if satisfies(&delays, &pairs) {
                    status = SolveStatus::Feasible;
                    break;
                }
                return Err(ScheduleError::Timeout(deadline));
            }

            let mut changed = false;
            for &(i, j) in &pairs {
                let bound = delays[i] + MIN_HEADWAY_MINUTES;
                if delays[j] < bound {
                    delays[j] = bound;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        // ── Horizon check ─────────────────────────────────────────────────
        if let Some(i) = (0..n).find(|&i| delays[i] > horizon_minutes) {
            return Err(ScheduleError::Infeasible {
                train_id: trains[i].train_id.clone(),
                horizon_minutes,
            });
        }

        let objective_value = match objective {
            Objective::MinimizeDelay => delays.iter().map(|&d| d as f64).sum(),
            Objective::MaximizeThroughput => delays.iter().copied().max().unwrap_or(0) as f64,
        };

        Ok(ScheduleSolution {
            status,
            delays,
            objective_value,
        })
    }
}

fn shares_section(a: &Train, b: &Train, sections: &[Section]) -> bool {
    sections
        .iter()
        .any(|s| s.contains(a.current_km) && s.contains(b.current_km))
}

fn satisfies(delays: &[u32], pairs: &[(usize, usize)]) -> bool {
    pairs
        .iter()
        .all(|&(i, j)| delays[j] >= delays[i] + MIN_HEADWAY_MINUTES)
}
