//! `rail-twin` — the decision-support orchestrator.
//!
//! # Data flow
//!
//! ```text
//! feed snapshot ──ingest──▶ StateStore ──snapshot──▶ AnalysisEngine
//!                                │                     ├─ ConflictPredictor ─▶ conflicts
//!                                │                     ├─ PrescriptiveMapper ─▶ actions
//!                                │                     └─ HybridOptimizer ───▶ schedule
//!                                └──what_if──▶ SimEngine ─▶ predicted states + impact
//! ```
//!
//! The twin and analysis engine are plain objects constructed once at
//! startup; callers hold them by reference.  This crate owns no wire format,
//! file format, or CLI surface — it is a library invoked in-process by the
//! serving layer.
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`feed`]     | ingestion record types                            |
//! | [`twin`]     | `DigitalTwin`, what-if request/response           |
//! | [`analysis`] | `AnalysisEngine`, `AnalysisReport`                |
//! | [`error`]    | `TwinError`, `TwinResult<T>`                      |

pub mod analysis;
pub mod error;
pub mod feed;
pub mod twin;


pub use analysis::{AnalysisEngine, AnalysisReport, AnalysisSummary, planning_inputs};
pub use error::{TwinError, TwinResult};
pub use feed::{BlockFeedRecord, SignalFeedRecord, SnapshotFeed, TrainFeedRecord};
pub use twin::{DigitalTwin, WhatIfRequest, WhatIfResponse};
