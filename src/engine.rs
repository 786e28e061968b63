//! Engine Module
//!
//! Composes the eviction store and the task ledger behind the composite-key
//! scheme. The store sits behind one exclusive critical section (every
//! accepted operation writes, so a reader/writer lock buys nothing); the
//! ledger's queue and lease table are independently locked and interleave
//! freely with store operations.

use std::sync::{Mutex, MutexGuard};

use crate::cache::{current_timestamp_ms, CacheEntry, CacheKey, CacheStats, EvictionStore, PutOutcome};
use crate::config::Config;
use crate::ledger::{TaskEntry, TaskLedger};

// == Key Status ==
/// Where a key currently lives, as reported to status probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    /// A materialized result is in the store
    Done,
    /// Work is queued or checked out to a worker
    Queued,
    /// The engine has never seen the key (or it was evicted)
    New,
}

// == Engine Stats ==
/// Combined statistics snapshot across both subsystems.
#[derive(Debug, Clone)]
pub struct EngineStats {
    /// Eviction store counters
    pub store: CacheStats,
    /// Tasks waiting in the queue
    pub queued_tasks: usize,
    /// Tasks checked out to workers
    pub active_leases: usize,
}

// == Cache Engine ==
/// The in-process cache-and-task engine shared by all transports.
///
/// The engine exclusively owns the store, the queue and the lease table; all
/// mutation goes through the operations below. Request handlers on any number
/// of threads may call in concurrently.
#[derive(Debug)]
pub struct CacheEngine {
    /// Eviction store behind its single critical section
    store: Mutex<EvictionStore>,
    /// Task queue + lease table, independently locked
    ledger: TaskLedger,
    /// When enabled, a `get` miss also submits a task for the same key
    submit_on_miss: bool,
}

impl CacheEngine {
    // == Constructors ==
    /// Creates a new engine.
    ///
    /// # Arguments
    /// * `capacity` - Store entry-count capacity
    /// * `max_entry_size` - Per-entry value size ceiling in bytes
    /// * `submit_on_miss` - Wire the get-miss → submit-task pattern
    /// * `lease_filter_by_model` - Lease only tasks matching the requested model
    pub fn new(
        capacity: usize,
        max_entry_size: usize,
        submit_on_miss: bool,
        lease_filter_by_model: bool,
    ) -> Self {
        Self {
            store: Mutex::new(EvictionStore::new(capacity, max_entry_size)),
            ledger: TaskLedger::new(lease_filter_by_model),
            submit_on_miss,
        }
    }

    /// Creates an engine from server configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.capacity,
            config.max_entry_size_bytes,
            config.submit_on_miss,
            config.lease_filter_by_model,
        )
    }

    // == Put ==
    /// Stores a value for a key. Oversized values yield a `Rejected` sentinel
    /// and leave the store unchanged; callers must check the outcome.
    pub fn put(&self, key: &CacheKey, value: String, confidence: Option<f64>) -> PutOutcome {
        lock(&self.store).put(key.composite(), value, confidence)
    }

    // == Get ==
    /// Looks up a key, promoting it on hit.
    ///
    /// With submit-on-miss enabled this is not a pure read: a miss also
    /// submits a task for the same key so a later worker lease computes it.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let hit = lock(&self.store).get(&key.composite());

        if hit.is_none() && self.submit_on_miss {
            // The store probe just missed; dedup against queue/leases only
            self.ledger.submit(TaskEntry::new(key.clone(), None), false);
        }

        hit
    }

    // == Submit Task ==
    /// Registers pending work for a key. A no-op when the key is already
    /// stored, leased, or queued. Returns true if the task was enqueued.
    ///
    /// The store probe and the ledger's own checks are individually atomic
    /// but not one transaction: a concurrent `put` can slip between them,
    /// leaving a queued task for a key that just became stored. Accepted
    /// trade-off; the queue itself never holds duplicates.
    pub fn submit_task(&self, key: CacheKey, sequence: Option<String>) -> bool {
        let already_stored = lock(&self.store).contains(&key.composite());
        self.ledger.submit(TaskEntry::new(key, sequence), already_stored)
    }

    // == Lease Tasks ==
    /// Checks out up to `max_batch` tasks FIFO, recording a lease per task.
    /// Returns immediately with whatever is available, including nothing.
    pub fn lease_tasks(&self, max_batch: usize, target_model: Option<&str>) -> Vec<TaskEntry> {
        self.ledger.lease(max_batch, target_model)
    }

    // == Resolve Task ==
    /// Releases the lease for a key, normally after the result was `put`.
    /// Resolving a key with no active lease is a silent no-op.
    pub fn resolve_task(&self, key: &CacheKey) -> bool {
        self.ledger.resolve(&key.composite())
    }

    // == Clear ==
    /// Empties the store, the queue and the lease table. The ledger is
    /// cleared while the store guard is held so no stale lease or queued
    /// item survives the reset.
    pub fn clear(&self) {
        let mut store = lock(&self.store);
        store.clear();
        self.ledger.clear();
    }

    // == Key Status ==
    /// Reports where a key currently lives.
    pub fn key_status(&self, key: &CacheKey) -> KeyStatus {
        let composite = key.composite();
        if lock(&self.store).contains(&composite) {
            return KeyStatus::Done;
        }
        if self.ledger.is_queued(&composite) || self.ledger.is_leased(&composite) {
            return KeyStatus::Queued;
        }
        KeyStatus::New
    }

    // == Stats ==
    /// Returns a combined statistics snapshot.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            store: lock(&self.store).stats(),
            queued_tasks: self.ledger.queued_len(),
            active_leases: self.ledger.leased_len(),
        }
    }

    // == Reclaim Expired Leases ==
    /// Re-queues leases older than `max_age_ms`. Extension behavior, driven
    /// by the background reclaim task when configured; the baseline engine
    /// never reclaims on its own.
    pub fn reclaim_expired_leases(&self, max_age_ms: u64) -> usize {
        self.ledger.reclaim_expired(max_age_ms, current_timestamp_ms())
    }
}

// == Lock Helper ==
/// Acquires the store mutex, recovering from poisoning so engine operations
/// stay total even after a panicking holder.
fn lock(mutex: &Mutex<EvictionStore>) -> MutexGuard<'_, EvictionStore> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
