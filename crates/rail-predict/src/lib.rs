//! `rail-predict` — conflict prediction and prescriptive action mapping.
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`conflict`]  | `ConflictPrediction`, `PrescriptiveAction` types  |
//! | [`predictor`] | `ConflictPredictor` (headway/platform/signal)     |
//! | [`prescribe`] | `PrescriptiveMapper` (conflicts → actions)        |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `fx-hash` | FxHash for the per-cycle grouping maps.             |

pub mod conflict;
pub mod predictor;
pub mod prescribe;

#[cfg(test)]
mod tests;

pub use conflict::{
    ActionKind, ConflictKind, ConflictPrediction, ConflictSite, PrescriptiveAction,
};
pub use predictor::ConflictPredictor;
pub use prescribe::PrescriptiveMapper;
