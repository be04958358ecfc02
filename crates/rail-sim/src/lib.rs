//! `rail-sim` — train dynamics and the what-if simulation engine.
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`dynamics`] | `max_acceleration`, `braking_distance`            |
//! | [`engine`]   | `SimEngine`, `Scenario`, `ImpactAnalysis`         |
//! | [`error`]    | `SimError`, `SimResult<T>`                        |

pub mod dynamics;
pub mod engine;
pub mod error;


pub use dynamics::{braking_distance, max_acceleration};
pub use engine::{ImpactAnalysis, Scenario, ScenarioAction, SimEngine, SimOutcome};
pub use error::{SimError, SimResult};
