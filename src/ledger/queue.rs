//! Task Ledger Module
//!
//! Deduplicated FIFO work distribution with an explicit lease/resolve
//! handshake. The queue and the lease table are independently locked and are
//! never covered by the eviction store's critical section: the dedup checks
//! are atomic per structure, not as a compound transaction, which leaves a
//! narrow documented race between a concurrent `submit` and `put` for the
//! same key.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::cache::current_timestamp_ms;
use crate::ledger::{LeaseRecord, TaskEntry};

// == Task Ledger ==
/// FIFO work queue plus lease table, keyed by composite key.
#[derive(Debug, Default)]
pub struct TaskLedger {
    /// Pending tasks in submission order (front = next to lease)
    queue: Mutex<VecDeque<TaskEntry>>,
    /// Composite key → active lease
    leases: Mutex<HashMap<String, LeaseRecord>>,
    /// Lease policy: when true, `lease` only drains tasks matching the
    /// requested model; when false (reference behavior) it drains FIFO
    /// regardless of model
    filter_by_model: bool,
}

impl TaskLedger {
    // == Constructor ==
    /// Creates an empty ledger with the given lease-filter policy.
    pub fn new(filter_by_model: bool) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            leases: Mutex::new(HashMap::new()),
            filter_by_model,
        }
    }

    // == Submit ==
    /// Enqueues a task unless its key is already materialized, leased, or
    /// queued. Returns true if the task was enqueued.
    ///
    /// Dedup is by composite key: repeated submission of the same key is
    /// idempotent and never produces a duplicate queue entry. The caller
    /// supplies `already_stored` from its own probe of the eviction store.
    pub fn submit(&self, task: TaskEntry, already_stored: bool) -> bool {
        if already_stored {
            return false;
        }

        let composite = task.composite_key();

        if lock(&self.leases).contains_key(&composite) {
            return false;
        }

        let mut queue = lock(&self.queue);
        if queue.iter().any(|queued| queued.composite_key() == composite) {
            return false;
        }
        queue.push_back(task);
        true
    }

    // == Lease ==
    /// Removes up to `max_batch` tasks from the head of the queue, records a
    /// lease timestamp for each, and returns the batch.
    ///
    /// Never blocks and never errors: an empty queue yields an empty batch.
    /// With the filter policy enabled and a target model given, only matching
    /// tasks are taken and the rest keep their queue position.
    pub fn lease(&self, max_batch: usize, target_model: Option<&str>) -> Vec<TaskEntry> {
        let mut batch = Vec::new();
        if max_batch == 0 {
            return batch;
        }

        {
            let mut queue = lock(&self.queue);
            match target_model.filter(|_| self.filter_by_model) {
                Some(model) => {
                    let mut kept = VecDeque::with_capacity(queue.len());
                    while let Some(task) = queue.pop_front() {
                        if batch.len() < max_batch && task.key.model_id.as_deref() == Some(model)
                        {
                            batch.push(task);
                        } else {
                            kept.push_back(task);
                        }
                    }
                    *queue = kept;
                }
                None => {
                    while batch.len() < max_batch {
                        match queue.pop_front() {
                            Some(task) => batch.push(task),
                            None => break,
                        }
                    }
                }
            }
        }

        if !batch.is_empty() {
            let now = current_timestamp_ms();
            let mut leases = lock(&self.leases);
            for task in &batch {
                leases.insert(
                    task.composite_key(),
                    LeaseRecord {
                        task: task.clone(),
                        leased_at_ms: now,
                    },
                );
            }
        }

        batch
    }

    // == Resolve ==
    /// Releases the lease for a composite key. A resolve with no active
    /// lease is a silent no-op. Returns true if a lease was removed.
    pub fn resolve(&self, composite: &str) -> bool {
        lock(&self.leases).remove(composite).is_some()
    }

    // == Reclaim Expired ==
    /// Re-queues leases older than `max_age_ms`, returning how many were
    /// reclaimed. Extension behavior: the reference design never reclaims,
    /// so this only runs when explicitly configured.
    pub fn reclaim_expired(&self, max_age_ms: u64, now_ms: u64) -> usize {
        let expired: Vec<TaskEntry> = {
            let mut leases = lock(&self.leases);
            let keys: Vec<String> = leases
                .iter()
                .filter(|(_, record)| now_ms.saturating_sub(record.leased_at_ms) >= max_age_ms)
                .map(|(key, _)| key.clone())
                .collect();
            keys.iter()
                .filter_map(|key| leases.remove(key))
                .map(|record| record.task)
                .collect()
        };

        let mut reclaimed = 0;
        let mut queue = lock(&self.queue);
        for task in expired {
            let composite = task.composite_key();
            if !queue.iter().any(|queued| queued.composite_key() == composite) {
                queue.push_back(task);
                reclaimed += 1;
            }
        }
        reclaimed
    }

    // == Membership Probes ==
    /// Returns true if the key is currently queued.
    pub fn is_queued(&self, composite: &str) -> bool {
        lock(&self.queue)
            .iter()
            .any(|task| task.composite_key() == composite)
    }

    /// Returns true if the key is currently leased to a worker.
    pub fn is_leased(&self, composite: &str) -> bool {
        lock(&self.leases).contains_key(composite)
    }

    // == Lengths ==
    /// Returns the number of queued tasks.
    pub fn queued_len(&self) -> usize {
        lock(&self.queue).len()
    }

    /// Returns the number of active leases.
    pub fn leased_len(&self) -> usize {
        lock(&self.leases).len()
    }

    // == Clear ==
    /// Empties the queue and the lease table.
    pub fn clear(&self) {
        lock(&self.queue).clear();
        lock(&self.leases).clear();
    }
}

// == Lock Helper ==
/// Acquires a mutex, recovering from poisoning: ledger state stays usable
/// even if a panicking thread held the lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
