//! Per-slot critical sections
//!
//! Every read-check-write sequence against one slot's capacity runs under
//! that slot's async mutex. The store is embedded and single-process, so
//! this registry is the row-lock equivalent; operations on different
//! slots never block each other.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct SlotLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the critical section for one slot. The guard must be held
    /// for the whole read-check-write sequence and never across a
    /// user-facing wait.
    pub async fn acquire(&self, slot_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(slot_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
