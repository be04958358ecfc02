//! The `StateStore` — the single shared mutable resource of the core.
//!
//! # Locking discipline
//!
//! Ingestion, conflict analysis, and what-if handling run as independent
//! periodic tasks over one store.  Every mutation and every multi-key read
//! goes through one mutex so a reader can never observe a partially updated
//! cross-train view mid-ingestion.  Readers that need a stable view call
//! [`StateStore::snapshot`], which clones the state inside the critical
//! section and releases the lock immediately — no lock is ever held across
//! simulation or solver work.
//!
//! A poisoned mutex is recovered with `PoisonError::into_inner`: writes are
//! wholesale replacements, so there is no torn invariant a panicking writer
//! could leave behind.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rail_core::{Aspect, BlockId, SignalId, Timestamp};

use crate::snapshot::{BlockObs, NetworkSnapshot, SignalObs, TrainObs};
use crate::state::{BlockState, TrainState};

struct StoreInner {
    trains: HashMap<String, TrainState>,
    /// Indexed by `SignalId`; aspects default to `Red` until a feed reports.
    signal_aspects: Vec<Aspect>,
    /// Indexed by `BlockId`.
    blocks: Vec<BlockState>,
    last_sync: Timestamp,
}

/// Thread-safe map of live train/signal/block state.
///
/// Construct once per twin with the topology's signal and block counts; the
/// key spaces never change after that (trains come and go, assets do not).
pub struct StateStore {
    inner: Mutex<StoreInner>,
}

impl StateStore {
    pub fn new(signal_count: usize, block_count: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                trains: HashMap::new(),
                signal_aspects: vec![Aspect::default(); signal_count],
                blocks: vec![BlockState::default(); block_count],
                last_sync: Timestamp::EPOCH,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace the state for `train_id` wholesale and bump `last_sync`.
    pub fn update_train(&self, train_id: &str, state: TrainState) {
        let mut inner = self.lock();
        inner.last_sync = state.last_update;
        inner.trains.insert(train_id.to_owned(), state);
    }

    /// Drop a train that has left the section.
    pub fn remove_train(&self, train_id: &str) -> Option<TrainState> {
        self.lock().trains.remove(train_id)
    }

    /// Set a signal's displayed aspect.  Out-of-range ids are ignored —
    /// aspect transitions are unconstrained inputs and a stale feed must not
    /// take the store down.
    pub fn update_signal(&self, signal: SignalId, aspect: Aspect) {
        let mut inner = self.lock();
        if let Some(slot) = inner.signal_aspects.get_mut(signal.index()) {
            *slot = aspect;
        }
    }

    /// Record a block section's occupant.  Vacating a previously occupied
    /// block stamps `last_cleared`.
    pub fn set_block_occupancy(
        &self,
        block: BlockId,
        occupied_by: Option<String>,
        at: Timestamp,
    ) {
        let mut inner = self.lock();
        if let Some(slot) = inner.blocks.get_mut(block.index()) {
            if slot.occupied_by.is_some() && occupied_by.is_none() {
                slot.last_cleared = Some(at);
            }
            slot.occupied_by = occupied_by;
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Point read of one train's state.
    pub fn train(&self, train_id: &str) -> Option<TrainState> {
        self.lock().trains.get(train_id).cloned()
    }

    pub fn train_count(&self) -> usize {
        self.lock().trains.len()
    }

    pub fn signal_aspect(&self, signal: SignalId) -> Option<Aspect> {
        self.lock().signal_aspects.get(signal.index()).copied()
    }

    /// Clone a consistent copy of the whole state and release the lock.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let inner = self.lock();

        let mut trains: Vec<TrainObs> = inner
            .trains
            .iter()
            .map(|(id, state)| TrainObs {
                train_id: id.clone(),
                state: state.clone(),
            })
            .collect();
        trains.sort_by(|a, b| a.train_id.cmp(&b.train_id));

        let signals = inner
            .signal_aspects
            .iter()
            .enumerate()
            .map(|(i, &aspect)| SignalObs {
                signal: SignalId(i as u32),
                aspect,
            })
            .collect();

        let blocks = inner
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| BlockObs {
                block: BlockId(i as u32),
                occupied_by: b.occupied_by.clone(),
                last_cleared: b.last_cleared,
            })
            .collect();

        NetworkSnapshot {
            taken_at: inner.last_sync,
            trains,
            signals,
            blocks,
        }
    }
}
