//! `rail-core` — foundational types for the rail-twin decision-support core.
//!
//! This crate is a dependency of every other `rail-*` crate.  It intentionally
//! has no `rail-*` dependencies and minimal external ones (optional `serde`
//! only).
//!
//! # What lives here
//!
//! | Module    | Contents                                            |
//! |-----------|-----------------------------------------------------|
//! | [`ids`]   | `NodeId`, `EdgeId`, `BlockId`, `SignalId`           |
//! | [`time`]  | `Timestamp`                                         |
//! | [`types`] | node kinds, aspects, priorities, severities         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod ids;
pub mod time;
pub mod types;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{BlockId, EdgeId, NodeId, SignalId};
pub use time::Timestamp;
pub use types::{
    Aspect, CapacityImpact, NodeKind, Severity, SignalKind, TrackCondition, TrainPriority, Urgency,
};
