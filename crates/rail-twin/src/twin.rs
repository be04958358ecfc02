//! The digital twin: topology + state store + simulation engine behind one
//! handle.
//!
//! One `DigitalTwin` is constructed at startup and passed by reference to
//! the ingestion, analysis, and HMI tasks — there are no hidden module-level
//! singletons.  All methods take `&self`: the store serializes mutation
//! internally, ingestion counts are atomic, and simulation is pure, so the
//! twin can be shared across threads as-is.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

use rail_core::{NodeId, Timestamp, TrainPriority};
use rail_sim::{ImpactAnalysis, Scenario, ScenarioAction, SimEngine, SimError};
use rail_state::{NetworkSnapshot, StateStore, TrainState};
use rail_topology::{DijkstraRouter, RailNetwork, Router};

use crate::error::{TwinError, TwinResult};
use crate::feed::SnapshotFeed;

// ── What-if request/response ──────────────────────────────────────────────────

/// A counterfactual query from the HMI: "what happens if I hold/reroute
/// train X?"
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhatIfRequest {
    pub train_id: String,
    /// `"HOLD"` or `"REROUTE"`; anything else is rejected.
    pub action: String,
    #[cfg_attr(feature = "serde", serde(default = "default_duration"))]
    pub duration_minutes: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_node: Option<String>,
}

#[cfg(feature = "serde")]
fn default_duration() -> u32 {
    30
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhatIfResponse {
    pub predicted_states: Vec<TrainState>,
    pub impact: ImpactAnalysis,
}

// ── DigitalTwin ───────────────────────────────────────────────────────────────

/// Topology-aware digital twin of one track section.
pub struct DigitalTwin<R: Router> {
    network: Arc<RailNetwork>,
    store: StateStore,
    engine: SimEngine<R>,
    /// Ingestion cycles processed since startup.
    update_count: AtomicU64,
}

impl DigitalTwin<DijkstraRouter> {
    /// A twin over `network` with the default shortest-path router.
    pub fn new(network: RailNetwork) -> Self {
        Self::with_router(network, DijkstraRouter)
    }
}

impl<R: Router> DigitalTwin<R> {
    pub fn with_router(network: RailNetwork, router: R) -> Self {
        let network = Arc::new(network);
        let store = StateStore::new(network.signal_count(), network.block_count());
        let engine = SimEngine::new(Arc::clone(&network), router);
        Self {
            network,
            store,
            engine,
            update_count: AtomicU64::new(0),
        }
    }

    pub fn network(&self) -> &RailNetwork {
        &self.network
    }

    /// Ingestion cycles processed since startup.
    pub fn update_count(&self) -> u64 {
        self.update_count.load(Ordering::Relaxed)
    }

    // ── Ingestion ─────────────────────────────────────────────────────────

    /// Fold one feed snapshot into the live state.
    ///
    /// Never fails: unknown asset names are logged and skipped (signals,
    /// blocks) or stored unresolved (trains), and missing fields arrive
    /// pre-defaulted from the feed layer.  Each train's state is replaced
    /// wholesale.
    pub fn ingest(&self, feed: &SnapshotFeed) {
        let at = Timestamp(feed.timestamp);

        for record in &feed.trains {
            if record.train_id.is_empty() {
                warn!("feed train record without train_id skipped");
                continue;
            }
            let node = match self.network.node_id(&record.current_node) {
                Some(node) => node,
                None => {
                    warn!(
                        "train {} reported at unknown node {:?}",
                        record.train_id, record.current_node
                    );
                    NodeId::INVALID
                }
            };

            let state = TrainState {
                current_node: node,
                current_edge: None,
                position_on_edge_m: 0.0,
                current_speed_kmh: record.current_speed,
                target_speed_kmh: record.target_speed,
                acceleration_ms2: record.acceleration,
                priority: TrainPriority::from_ordinal(record.priority),
                last_update: at,
            };
            self.store.update_train(&record.train_id, state);
        }

        for record in &feed.signals {
            let Some(signal) = self.network.signal_id(&record.signal_id) else {
                warn!("aspect report for unknown signal {:?}", record.signal_id);
                continue;
            };
            match record.aspect.parse() {
                Ok(aspect) => self.store.update_signal(signal, aspect),
                Err(e) => warn!("signal {}: {e}", record.signal_id),
            }
        }

        for record in &feed.section_status {
            let Some(block) = self.network.block_id(&record.block_id) else {
                warn!("occupancy report for unknown block {:?}", record.block_id);
                continue;
            };
            self.store
                .set_block_occupancy(block, record.occupied_by.clone(), at);
        }

        self.update_count.fetch_add(1, Ordering::Relaxed);
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Point-in-time copy of the whole section state.
    pub fn snapshot(&self) -> NetworkSnapshot {
        self.store.snapshot()
    }

    /// Trains currently on the shortest route between two nodes.
    pub fn section_occupancy(&self, start: NodeId, end: NodeId) -> Vec<String> {
        let route = self.network.find_route(self.engine.router(), start, end);
        if route.is_empty() {
            return vec![];
        }
        self.snapshot()
            .trains
            .into_iter()
            .filter(|t| route.contains(&t.state.current_node))
            .map(|t| t.train_id)
            .collect()
    }

    // ── What-if ───────────────────────────────────────────────────────────

    /// Evaluate a hold/reroute counterfactual by forward simulation.
    ///
    /// # Errors
    ///
    /// - [`SimError::TrainNotFound`] when the train is not in the store.
    /// - [`SimError::UnsupportedAction`] for action strings other than
    ///   `HOLD`/`REROUTE`.
    /// - [`TwinError::MissingTarget`] for a reroute without a target node.
    pub fn what_if(&self, request: &WhatIfRequest) -> TwinResult<WhatIfResponse> {
        let state = self
            .store
            .train(&request.train_id)
            .ok_or_else(|| SimError::TrainNotFound(request.train_id.clone()))?;

        let action = match request.action.as_str() {
            "HOLD" => ScenarioAction::Hold,
            "REROUTE" => {
                let name = request.target_node.as_deref().ok_or(TwinError::MissingTarget)?;
                let target = self
                    .network
                    .node_id(name)
                    .ok_or_else(|| rail_topology::TopologyError::UnknownNode(name.to_owned()))?;
                ScenarioAction::Reroute { target }
            }
            other => return Err(SimError::UnsupportedAction(other.to_owned()).into()),
        };

        let scenario = Scenario {
            train_id: request.train_id.clone(),
            action,
            duration_minutes: request.duration_minutes,
        };
        let outcome = self.engine.simulate(&scenario, &state);

        Ok(WhatIfResponse {
            predicted_states: outcome.states,
            impact: outcome.impact,
        })
    }
}
