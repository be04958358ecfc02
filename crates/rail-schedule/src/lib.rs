//! `rail-schedule` — constrained schedule optimization.
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`problem`]   | `Train`, `Section`, `Objective` planning inputs         |
//! | [`scorer`]    | `ConflictScorer` + heuristic/learned implementations    |
//! | [`solver`]    | `Scheduler` capability, `FixpointScheduler` default     |
//! | [`optimizer`] | `HybridOptimizer` (solve → map → refine)                |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                    |

pub mod error;
pub mod optimizer;
pub mod problem;
pub mod scorer;
pub mod solver;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use optimizer::{
    DEFAULT_HORIZON_MINUTES, DEFAULT_SOLVE_BUDGET, HybridOptimizer, OptimizationResult,
    Recommendation, TrainAction,
};
pub use problem::{Objective, Section, Train};
pub use scorer::{ConflictScorer, HeuristicScorer, LearnedScorer};
pub use solver::{
    CAPACITY_HOLD_MINUTES, FixpointScheduler, MIN_HEADWAY_MINUTES, ScheduleSolution, Scheduler,
    SolveStatus,
};
