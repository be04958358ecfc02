//! `rail-state` — live section state and the mutex-guarded store.
//!
//! | Module       | Contents                                    |
//! |--------------|---------------------------------------------|
//! | [`state`]    | `TrainState`, `BlockState`                  |
//! | [`store`]    | `StateStore` (the one shared mutable thing) |
//! | [`snapshot`] | `NetworkSnapshot` and its observation types |

pub mod snapshot;
pub mod state;
pub mod store;


pub use snapshot::{BlockObs, NetworkSnapshot, SignalObs, TrainObs};
pub use state::{BlockState, TrainState};
pub use store::StateStore;
