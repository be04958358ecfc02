//! CSV topology loader.
//!
//! # CSV formats
//!
//! Four files describe a section: nodes, tracks, blocks, signals.  All
//! asset references between files are by node name; names must be declared
//! in the nodes file before the others reference them.
//!
//! ```csv
//! name,kind,km,code,lat,lon
//! STN_A,STATION,100.0,STNA,12.9716,77.5946
//! SIG_001,SIGNAL,105.0,,,
//! ```
//!
//! ```csv
//! from,to,length_m,gradient_pct,curvature,speed_kmh,condition,bidirectional
//! STN_A,SIG_001,5000,0.5,2.0,80,GOOD,true
//! ```
//!
//! ```csv
//! name,from,to,length_m
//! BLK_001,STN_A,SIG_001,5000
//! ```
//!
//! ```csv
//! name,node,kind
//! SIG_001,SIG_001,HOME
//! ```
//!
//! Optional columns (`code`, `lat`/`lon`, `gradient_pct`, `curvature`,
//! `speed_kmh`, `condition`, `bidirectional`) may be empty; they fall back to
//! flat, straight, 100 km/h, `GOOD`, one-way.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rail_core::{NodeId, NodeKind, SignalKind, TrackCondition};

use crate::network::{RailNetwork, RailNetworkBuilder, TrackSpec};
use crate::TopologyError;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    name: String,
    kind: String,
    km: f32,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    lat: Option<f32>,
    #[serde(default)]
    lon: Option<f32>,
}

#[derive(Deserialize)]
struct TrackRecord {
    from: String,
    to: String,
    length_m: f32,
    #[serde(default)]
    gradient_pct: f32,
    #[serde(default)]
    curvature: f32,
    #[serde(default = "default_speed")]
    speed_kmh: f32,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    bidirectional: bool,
}

fn default_speed() -> f32 {
    100.0
}

#[derive(Deserialize)]
struct BlockRecord {
    name: String,
    from: String,
    to: String,
    length_m: f32,
}

#[derive(Deserialize)]
struct SignalRecord {
    name: String,
    node: String,
    kind: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RailNetwork`] from four CSV files.
pub fn load_network_csv(
    nodes: &Path,
    tracks: &Path,
    blocks: &Path,
    signals: &Path,
) -> Result<RailNetwork, TopologyError> {
    load_network_reader(
        std::fs::File::open(nodes)?,
        std::fs::File::open(tracks)?,
        std::fs::File::open(blocks)?,
        std::fs::File::open(signals)?,
    )
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading from network
/// streams.
pub fn load_network_reader<N, T, B, S>(
    nodes: N,
    tracks: T,
    blocks: B,
    signals: S,
) -> Result<RailNetwork, TopologyError>
where
    N: Read,
    T: Read,
    B: Read,
    S: Read,
{
    let mut builder = RailNetworkBuilder::new();

    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| TopologyError::Parse(e.to_string()))?;
        let kind = parse_node_kind(&row.kind)?;
        let coord = match (row.lat, row.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        match kind {
            NodeKind::Station => {
                builder.add_station(row.name, row.km, row.code.as_deref(), coord);
            }
            _ => {
                builder.add_node(row.name, kind, row.km);
            }
        }
    }

    // Track/block/signal rows reference nodes by name; resolve against what
    // the builder has seen so far.
    let resolve = |builder: &RailNetworkBuilder, name: &str| -> Result<NodeId, TopologyError> {
        builder
            .node_id(name)
            .ok_or_else(|| TopologyError::UnknownNode(name.to_owned()))
    };

    for result in csv::Reader::from_reader(tracks).deserialize::<TrackRecord>() {
        let row = result.map_err(|e| TopologyError::Parse(e.to_string()))?;
        let from = resolve(&builder, &row.from)?;
        let to = resolve(&builder, &row.to)?;
        let spec = TrackSpec {
            length_m: row.length_m,
            gradient_pct: row.gradient_pct,
            curvature_deg_per_km: row.curvature,
            speed_limit_kmh: row.speed_kmh,
            condition: parse_condition(row.condition.as_deref())?,
        };
        if row.bidirectional {
            builder.add_double_track(from, to, spec);
        } else {
            builder.add_track(from, to, spec);
        }
    }

    for result in csv::Reader::from_reader(blocks).deserialize::<BlockRecord>() {
        let row = result.map_err(|e| TopologyError::Parse(e.to_string()))?;
        let from = resolve(&builder, &row.from)?;
        let to = resolve(&builder, &row.to)?;
        builder.add_block(row.name, from, to, row.length_m);
    }

    for result in csv::Reader::from_reader(signals).deserialize::<SignalRecord>() {
        let row = result.map_err(|e| TopologyError::Parse(e.to_string()))?;
        let node = resolve(&builder, &row.node)?;
        builder.add_signal(row.name, node, parse_signal_kind(&row.kind)?);
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_node_kind(s: &str) -> Result<NodeKind, TopologyError> {
    match s.trim() {
        "STATION" => Ok(NodeKind::Station),
        "SIGNAL" => Ok(NodeKind::Signal),
        "JUNCTION" => Ok(NodeKind::Junction),
        other => Err(TopologyError::Parse(format!("invalid node kind {other:?}"))),
    }
}

fn parse_signal_kind(s: &str) -> Result<SignalKind, TopologyError> {
    match s.trim() {
        "HOME" => Ok(SignalKind::Home),
        "STARTER" => Ok(SignalKind::Starter),
        "DISTANT" => Ok(SignalKind::Distant),
        "SHUNT" => Ok(SignalKind::Shunt),
        "AUTOMATIC" => Ok(SignalKind::Automatic),
        other => Err(TopologyError::Parse(format!(
            "invalid signal kind {other:?}"
        ))),
    }
}

fn parse_condition(s: Option<&str>) -> Result<TrackCondition, TopologyError> {
    match s.map(str::trim) {
        None | Some("") | Some("GOOD") => Ok(TrackCondition::Good),
        Some("FAIR") => Ok(TrackCondition::Fair),
        Some("POOR") => Ok(TrackCondition::Poor),
        Some("CRITICAL") => Ok(TrackCondition::Critical),
        Some(other) => Err(TopologyError::Parse(format!(
            "invalid track condition {other:?}"
        ))),
    }
}
