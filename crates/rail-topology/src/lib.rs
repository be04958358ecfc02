//! `rail-topology` — static rail network graph and shortest-route queries.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`network`] | `RailNetwork` (CSR graph + asset registries), builder     |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`loader`]  | CSV loading of nodes/tracks/blocks/signals                |
//! | [`error`]   | `TopologyError`, `TopologyResult<T>`                      |
//!
//! The network is loaded once at twin initialization and is immutable for
//! the life of the process.

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{TopologyError, TopologyResult};
pub use loader::{load_network_csv, load_network_reader};
pub use network::{RailNetwork, RailNetworkBuilder, TrackSpec};
pub use router::{DijkstraRouter, Route, Router};
