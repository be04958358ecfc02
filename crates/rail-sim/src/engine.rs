//! The what-if simulation engine.
//!
//! Forward-simulates one train's motion under a hypothetical operator action
//! (hold or reroute) before the action is committed.  The engine is pure and
//! re-entrant: it reads an immutable topology and a caller-supplied copy of
//! the train's state, holds no mutable state of its own, and can run
//! concurrently with other what-if queries.

use std::sync::Arc;

use log::warn;

use rail_core::{CapacityImpact, NodeId};
use rail_state::TrainState;
use rail_topology::{RailNetwork, Router};

/// Simulation step width in seconds for reroute stepping.
const TIME_STEP_SECS: f32 = 5.0;

/// Speed cap applied during forward simulation, km/h.
const MAX_SIM_SPEED_KMH: f32 = 120.0;

// ── Scenario ──────────────────────────────────────────────────────────────────

/// A hypothetical operator action to evaluate.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub train_id: String,
    pub action: ScenarioAction,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioAction {
    /// Keep the train where it stands for the scenario duration.
    Hold,
    /// Run the train towards `target` along the shortest route.
    Reroute { target: NodeId },
}

// ── Impact ────────────────────────────────────────────────────────────────────

/// Operational impact summary attached to every what-if response.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactAnalysis {
    Hold {
        delay_added_minutes: f32,
        /// Downstream trains affected by the hold.  Populating this requires
        /// a propagation model this core does not carry; empty for now.
        affected_trains: Vec<String>,
        capacity_impact: CapacityImpact,
        estimated_recovery_minutes: f32,
    },
    Reroute {
        route_change: bool,
        /// Fixed estimate; replace with a route-delta computation from the
        /// topology once the reroute step uses the full route.
        additional_distance_km: f32,
        time_impact_minutes: f32,
        /// Block sections freed at the train's present position.
        capacity_freed: Vec<String>,
    },
}

/// The full result of one what-if simulation.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    /// Predicted train states, one per sample (per minute for holds, per
    /// 5-second step for reroutes), starting with the input state.
    pub states: Vec<TrainState>,
    pub impact: ImpactAnalysis,
}

// ── SimEngine ─────────────────────────────────────────────────────────────────

/// Discrete-time forward simulator over the shared topology.
///
/// # Type parameter
///
/// `R` is the routing algorithm ([`rail_topology::DijkstraRouter`] unless the
/// application swaps in its own).
pub struct SimEngine<R: Router> {
    network: Arc<RailNetwork>,
    router: R,
}

impl<R: Router> SimEngine<R> {
    pub fn new(network: Arc<RailNetwork>, router: R) -> Self {
        Self { network, router }
    }

    pub fn network(&self) -> &RailNetwork {
        &self.network
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Evaluate `scenario` starting from `start` (a snapshot copy owned by
    /// the caller).  Never fails: the caller validates train existence and
    /// action shape before constructing a [`Scenario`].
    pub fn simulate(&self, scenario: &Scenario, start: &TrainState) -> SimOutcome {
        match scenario.action {
            ScenarioAction::Hold => self.simulate_hold(start, scenario.duration_minutes),
            ScenarioAction::Reroute { target } => {
                self.simulate_reroute(&scenario.train_id, start, target, scenario.duration_minutes)
            }
        }
    }

    // ── Hold ──────────────────────────────────────────────────────────────

    /// One sample per simulated minute, inclusive of minute zero, with speed
    /// and acceleration pinned to zero and the position unchanged.
    fn simulate_hold(&self, start: &TrainState, duration_minutes: u32) -> SimOutcome {
        let base = start.last_update;
        let states = (0..=duration_minutes)
            .map(|m| start.held(base.offset_mins(m as i64)))
            .collect();

        SimOutcome {
            states,
            impact: ImpactAnalysis::Hold {
                delay_added_minutes: duration_minutes as f32,
                affected_trains: vec![],
                capacity_impact: CapacityImpact::Moderate,
                estimated_recovery_minutes: duration_minutes as f32 * 1.5,
            },
        }
    }

    // ── Reroute ───────────────────────────────────────────────────────────

    /// Step the train forward every 5 simulated seconds towards `target`.
    ///
    /// If the topology has no route to the target, the scenario degrades to a
    /// single unchanged state rather than failing — preserved source
    /// behavior; see the design notes before hardening.
    fn simulate_reroute(
        &self,
        train_id: &str,
        start: &TrainState,
        target: NodeId,
        duration_minutes: u32,
    ) -> SimOutcome {
        let impact = self.reroute_impact(start);

        if self.router.route(&self.network, start.current_node, target).is_err() {
            warn!(
                "no route from {} to {} for what-if reroute of {train_id}; returning current state",
                self.network.name_of(start.current_node),
                self.network.name_of(target),
            );
            return SimOutcome {
                states: vec![start.clone()],
                impact,
            };
        }

        let steps = duration_minutes * 60 / TIME_STEP_SECS as u32;
        let base = start.last_update;
        let mut states = Vec::with_capacity(steps as usize + 1);
        states.push(start.clone());

        let mut current = start.clone();
        for step in 1..=steps {
            let mut next = current.clone();

            // First-order kinematics per step.
            next.current_speed_kmh = (current.current_speed_kmh
                + current.acceleration_ms2 * TIME_STEP_SECS)
                .clamp(0.0, MAX_SIM_SPEED_KMH);
            next.position_on_edge_m += next.current_speed_kmh * (TIME_STEP_SECS / 3.6);

            // Crossing the end of the current segment advances the train to
            // the segment's destination node.
            if let Some(edge) = current.current_edge
                && next.position_on_edge_m >= self.network.edge_length_m[edge.index()]
            {
                next.current_node = self.network.edge_to[edge.index()];
                next.current_edge = None;
                next.position_on_edge_m = 0.0;
            }

            next.last_update = base.offset_secs((step as i64) * TIME_STEP_SECS as i64);
            states.push(next.clone());
            current = next;
        }

        SimOutcome { states, impact }
    }

    /// Fixed-estimate reroute impact.  The distance/time values are
    /// placeholders pending route-delta computation; the freed blocks are
    /// those leaving the train's present node.
    fn reroute_impact(&self, start: &TrainState) -> ImpactAnalysis {
        let capacity_freed = if start.current_node.index() < self.network.node_count() {
            self.network
                .out_edges(start.current_node)
                .filter_map(|e| {
                    self.network
                        .block_between(start.current_node, self.network.edge_to[e.index()])
                })
                .map(|b| self.network.block_name[b.index()].clone())
                .collect()
        } else {
            vec![]
        };

        ImpactAnalysis::Reroute {
            route_change: true,
            additional_distance_km: 2.5,
            time_impact_minutes: 8.0,
            capacity_freed,
        }
    }
}

// ── Convenience ───────────────────────────────────────────────────────────────

impl Scenario {
    /// A hold scenario for `train_id`.
    pub fn hold(train_id: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            train_id: train_id.into(),
            action: ScenarioAction::Hold,
            duration_minutes,
        }
    }

    /// A reroute scenario towards `target`.
    pub fn reroute(train_id: impl Into<String>, target: NodeId, duration_minutes: u32) -> Self {
        Self {
            train_id: train_id.into(),
            action: ScenarioAction::Reroute { target },
            duration_minutes,
        }
    }
}
