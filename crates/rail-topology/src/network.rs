//! Rail network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, …) are sorted by
//! source node and indexed by `EdgeId`.  Iteration over a node's outgoing
//! edges is therefore a contiguous memory scan — ideal for Dijkstra's inner
//! loop.
//!
//! Block sections and signals are stored in parallel arrays of their own,
//! indexed by `BlockId` / `SignalId`, with name-interning maps so the
//! ingestion boundary can resolve the feed's string identifiers once and the
//! rest of the core works with integer IDs.
//!
//! The network is built once at twin initialization and is immutable
//! thereafter; runtime reconfiguration is out of scope.

use std::collections::HashMap;

use rail_core::{BlockId, EdgeId, NodeId, NodeKind, SignalId, SignalKind, TrackCondition};

// ── RailNetwork ───────────────────────────────────────────────────────────────

/// Directed rail graph in CSR format plus block-section and signal registries.
///
/// All per-asset fields are `pub` for direct indexed access on hot paths.  Do
/// not construct directly; use [`RailNetworkBuilder`].
pub struct RailNetwork {
    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    /// External name of each node (e.g. `"STN_A"`).
    pub node_name: Vec<String>,
    /// What the node represents on the ground.
    pub node_kind: Vec<NodeKind>,
    /// Kilometre marker along the line.
    pub node_km: Vec<f32>,
    /// Optional station code (stations only).
    pub node_code: Vec<Option<String>>,
    /// Optional geographic coordinates as `(lat, lon)`.
    pub node_coord: Vec<Option<(f32, f32)>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Redundant with CSR but required for
    /// efficient route reconstruction (trace `prev_edge` back to source).
    pub edge_from: Vec<NodeId>,
    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,
    /// Segment length in metres.  Used as the Dijkstra edge cost.
    pub edge_length_m: Vec<f32>,
    /// Grade in percent; positive is uphill in the edge direction.
    pub edge_gradient_pct: Vec<f32>,
    /// Curvature in degrees per kilometre.
    pub edge_curvature: Vec<f32>,
    /// Line speed limit in km/h.
    pub edge_speed_kmh: Vec<f32>,
    /// Maintenance condition of the segment.
    pub edge_condition: Vec<TrackCondition>,

    // ── Block sections (indexed by BlockId) ───────────────────────────────
    pub block_name: Vec<String>,
    pub block_from: Vec<NodeId>,
    pub block_to: Vec<NodeId>,
    pub block_length_m: Vec<f32>,

    // ── Signals (indexed by SignalId) ─────────────────────────────────────
    pub signal_name: Vec<String>,
    /// Node the signal protects.
    pub signal_node: Vec<NodeId>,
    pub signal_kind: Vec<SignalKind>,

    // ── Name interning ────────────────────────────────────────────────────
    name_to_node: HashMap<String, NodeId>,
    name_to_block: HashMap<String, BlockId>,
    name_to_signal: HashMap<String, SignalId>,
    /// `(from, to)` node pair → the block section spanning it.
    pair_to_block: HashMap<(NodeId, NodeId), BlockId>,
}

impl RailNetwork {
    /// Construct an empty network with no assets.  Any routing request
    /// against it fails with [`TopologyError::NoRoute`](crate::TopologyError).
    pub fn empty() -> Self {
        RailNetworkBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_name.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn block_count(&self) -> usize {
        self.block_name.len()
    }

    pub fn signal_count(&self) -> usize {
        self.signal_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_name.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing track segments).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).count()
    }

    /// Nodes reachable from `node` in one hop.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    // ── Asset lookups ─────────────────────────────────────────────────────

    /// Resolve an external node name to its `NodeId`.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_to_node.get(name).copied()
    }

    /// Kind of `node`; `None` for the `INVALID` sentinel or out-of-range IDs.
    pub fn kind_of(&self, node: NodeId) -> Option<NodeKind> {
        self.node_kind.get(node.index()).copied()
    }

    /// `true` if `node` is a station.  The `INVALID` sentinel is not.
    #[inline]
    pub fn is_station(&self, node: NodeId) -> bool {
        self.kind_of(node) == Some(NodeKind::Station)
    }

    /// Display name for `node`; `"?"` for the `INVALID` sentinel.
    pub fn name_of(&self, node: NodeId) -> &str {
        self.node_name
            .get(node.index())
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn signal_id(&self, name: &str) -> Option<SignalId> {
        self.name_to_signal.get(name).copied()
    }

    pub fn signal_name_of(&self, signal: SignalId) -> &str {
        self.signal_name
            .get(signal.index())
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.name_to_block.get(name).copied()
    }

    /// The block section spanning the directed node pair `(from, to)`, if any.
    pub fn block_between(&self, from: NodeId, to: NodeId) -> Option<BlockId> {
        self.pair_to_block.get(&(from, to)).copied()
    }
}

// ── TrackSpec ─────────────────────────────────────────────────────────────────

/// Physical parameters of one directed track segment, passed to
/// [`RailNetworkBuilder::add_track`].
#[derive(Copy, Clone, Debug)]
pub struct TrackSpec {
    pub length_m: f32,
    pub gradient_pct: f32,
    pub curvature_deg_per_km: f32,
    pub speed_limit_kmh: f32,
    pub condition: TrackCondition,
}

impl TrackSpec {
    /// A flat, straight segment at the default 100 km/h line speed.
    pub fn flat(length_m: f32) -> Self {
        Self {
            length_m,
            gradient_pct: 0.0,
            curvature_deg_per_km: 0.0,
            speed_limit_kmh: 100.0,
            condition: TrackCondition::Good,
        }
    }
}

// ── RailNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RailNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes, tracks, blocks, and signals in any order
/// (tracks must reference previously added nodes).  `build()` sorts edges by
/// source node and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use rail_core::{NodeKind, SignalKind};
/// use rail_topology::{RailNetworkBuilder, TrackSpec};
///
/// let mut b = RailNetworkBuilder::new();
/// let a = b.add_station("STN_A", 100.0, Some("STNA"), None);
/// let s = b.add_node("SIG_001", NodeKind::Signal, 105.0);
/// b.add_track(a, s, TrackSpec::flat(5_000.0));
/// b.add_block("BLK_001", a, s, 5_000.0);
/// b.add_signal("SIG_001", s, SignalKind::Home);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// ```
pub struct RailNetworkBuilder {
    nodes: Vec<RawNode>,
    raw_edges: Vec<RawEdge>,
    blocks: Vec<RawBlock>,
    signals: Vec<RawSignal>,
}

struct RawNode {
    name: String,
    kind: NodeKind,
    km: f32,
    code: Option<String>,
    coord: Option<(f32, f32)>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    spec: TrackSpec,
}

struct RawBlock {
    name: String,
    from: NodeId,
    to: NodeId,
    length_m: f32,
}

struct RawSignal {
    name: String,
    node: NodeId,
    kind: SignalKind,
}

impl RailNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            raw_edges: Vec::new(),
            blocks: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind, km: f32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RawNode {
            name: name.into(),
            kind,
            km,
            code: None,
            coord: None,
        });
        id
    }

    /// Add a station node with its code and optional coordinates.
    pub fn add_station(
        &mut self,
        name: impl Into<String>,
        km: f32,
        code: Option<&str>,
        coord: Option<(f32, f32)>,
    ) -> NodeId {
        let id = self.add_node(name, NodeKind::Station, km);
        let raw = &mut self.nodes[id.index()];
        raw.code = code.map(str::to_owned);
        raw.coord = coord;
        id
    }

    /// Add a **directed** track segment from `from` to `to`.
    pub fn add_track(&mut self, from: NodeId, to: NodeId, spec: TrackSpec) {
        self.raw_edges.push(RawEdge { from, to, spec });
    }

    /// Convenience: add track in **both directions** for a double-worked
    /// segment.
    pub fn add_double_track(&mut self, a: NodeId, b: NodeId, spec: TrackSpec) {
        self.add_track(a, b, spec);
        self.add_track(b, a, spec);
    }

    /// Register a block section spanning the directed pair `(from, to)`.
    pub fn add_block(
        &mut self,
        name: impl Into<String>,
        from: NodeId,
        to: NodeId,
        length_m: f32,
    ) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(RawBlock {
            name: name.into(),
            from,
            to,
            length_m,
        });
        id
    }

    /// Register a lineside signal protecting `node`.
    pub fn add_signal(
        &mut self,
        name: impl Into<String>,
        node: NodeId,
        kind: SignalKind,
    ) -> SignalId {
        let id = SignalId(self.signals.len() as u32);
        self.signals.push(RawSignal {
            name: name.into(),
            node,
            kind,
        });
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Look up a node added earlier by name (used by the CSV loader to
    /// resolve track/block/signal references).  Last declaration wins.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .rposition(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// Consume the builder and produce a [`RailNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort, where E = edges.
    pub fn build(self) -> RailNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Sort edges by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f32> = raw.iter().map(|e| e.spec.length_m).collect();
        let edge_gradient_pct: Vec<f32> = raw.iter().map(|e| e.spec.gradient_pct).collect();
        let edge_curvature: Vec<f32> = raw.iter().map(|e| e.spec.curvature_deg_per_km).collect();
        let edge_speed_kmh: Vec<f32> = raw.iter().map(|e| e.spec.speed_limit_kmh).collect();
        let edge_condition: Vec<TrackCondition> = raw.iter().map(|e| e.spec.condition).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Intern names.  Last entry wins on duplicates.
        let name_to_node: HashMap<String, NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.clone(), NodeId(i as u32)))
            .collect();
        let name_to_block: HashMap<String, BlockId> = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), BlockId(i as u32)))
            .collect();
        let name_to_signal: HashMap<String, SignalId> = self
            .signals
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), SignalId(i as u32)))
            .collect();
        let pair_to_block: HashMap<(NodeId, NodeId), BlockId> = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| ((b.from, b.to), BlockId(i as u32)))
            .collect();

        RailNetwork {
            node_name: self.nodes.iter().map(|n| n.name.clone()).collect(),
            node_kind: self.nodes.iter().map(|n| n.kind).collect(),
            node_km: self.nodes.iter().map(|n| n.km).collect(),
            node_code: self.nodes.iter().map(|n| n.code.clone()).collect(),
            node_coord: self.nodes.iter().map(|n| n.coord).collect(),
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_gradient_pct,
            edge_curvature,
            edge_speed_kmh,
            edge_condition,
            block_name: self.blocks.iter().map(|b| b.name.clone()).collect(),
            block_from: self.blocks.iter().map(|b| b.from).collect(),
            block_to: self.blocks.iter().map(|b| b.to).collect(),
            block_length_m: self.blocks.iter().map(|b| b.length_m).collect(),
            signal_name: self.signals.iter().map(|s| s.name.clone()).collect(),
            signal_node: self.signals.iter().map(|s| s.node).collect(),
            signal_kind: self.signals.iter().map(|s| s.kind).collect(),
            name_to_node,
            name_to_block,
            name_to_signal,
            pair_to_block,
        }
    }
}

impl Default for RailNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
