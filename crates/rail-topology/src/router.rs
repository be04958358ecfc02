//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The twin calls routing via the [`Router`] trait, so applications can swap
//! in custom implementations (A*, precomputed route tables, timetable-aware
//! routing) without touching the core.  The default [`DijkstraRouter`] is
//! sufficient for section-scale networks.
//!
//! # Cost units
//!
//! Dijkstra costs are whole metres (`u32`) internally for exact comparisons
//! and deterministic tie-breaking; `Route` exposes the precise
//! `total_length_m` as `f32`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rail_core::{BlockId, EdgeId, NodeId};

use crate::TopologyError;
use crate::network::RailNetwork;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the ordered node list, the edges that
/// connect them, and the total length.
#[derive(Debug, Clone)]
pub struct Route {
    /// Nodes visited in order, from start to destination (inclusive).
    pub nodes: Vec<NodeId>,
    /// Edges traversed in order; `nodes.len() == edges.len() + 1`.
    pub edges: Vec<EdgeId>,
    /// Cumulative track length in metres.
    pub total_length_m: f32,
}

impl Route {
    /// `true` if the start and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so concurrent what-if queries can
/// share one router.
pub trait Router: Send + Sync {
    /// Compute the shortest route (by track length) from `from` to `to`.
    ///
    /// `from == to` is a trivial single-node route, not an error.
    fn route(
        &self,
        network: &RailNetwork,
        from: NodeId,
        to: NodeId,
    ) -> Result<Route, TopologyError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR rail graph, weighted by
/// `edge_length_m`.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RailNetwork,
        from: NodeId,
        to: NodeId,
    ) -> Result<Route, TopologyError> {
        dijkstra(network, from, to)
    }
}

fn dijkstra(network: &RailNetwork, from: NodeId, to: NodeId) -> Result<Route, TopologyError> {
    if from == to {
        return Ok(Route {
            nodes: vec![from],
            edges: vec![],
            total_length_m: 0.0,
        });
    }
    if from.index() >= network.node_count() || to.index() >= network.node_count() {
        return Err(TopologyError::NoRoute { from, to });
    }

    let n = network.node_count();
    // dist[v] = best known cost (whole metres) to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, prev_edge, from, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let step = network.edge_length_m[edge.index()].round().max(0.0) as u32;
            let new_cost = cost.saturating_add(step);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(TopologyError::NoRoute { from, to })
}

fn reconstruct(network: &RailNetwork, prev_edge: Vec<EdgeId>, from: NodeId, to: NodeId) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    let total_length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();

    Route {
        nodes,
        edges,
        total_length_m,
    }
}

// ── Route-derived queries ─────────────────────────────────────────────────────

impl RailNetwork {
    /// Ordered node list of the shortest route from `from` to `to`, or an
    /// empty list if the destination is unreachable.
    pub fn find_route<R: Router>(&self, router: &R, from: NodeId, to: NodeId) -> Vec<NodeId> {
        match router.route(self, from, to) {
            Ok(route) => route.nodes,
            Err(_) => vec![],
        }
    }

    /// Block sections lying on `route`, in traversal order.
    pub fn blocks_on_route(&self, route: &Route) -> Vec<BlockId> {
        route
            .nodes
            .windows(2)
            .filter_map(|pair| self.block_between(pair[0], pair[1]))
            .collect()
    }

    /// Theoretical capacity of the section between two nodes: the number of
    /// block sections on the shortest route, floored at 1.
    pub fn section_capacity<R: Router>(
        &self,
        router: &R,
        start: NodeId,
        end: NodeId,
    ) -> Result<u32, TopologyError> {
        let route = router.route(self, start, end)?;
        Ok((self.blocks_on_route(&route).len() as u32).max(1))
    }
}
