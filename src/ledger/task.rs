//! Task Entry Module
//!
//! Defines pending-work records and the lease records that track checked-out
//! tasks.

use crate::cache::CacheKey;

// == Task Entry ==
/// A unit of pending work waiting for a worker.
///
/// A task represents work not yet done; a stored cache entry represents a
/// materialized result. The two are correlated only by composite key.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntry {
    /// Addressing key shared with the eviction store
    pub key: CacheKey,
    /// Producer-supplied input payload / version tag, opaque to the engine
    pub sequence: Option<String>,
}

impl TaskEntry {
    // == Constructor ==
    /// Creates a new task entry.
    pub fn new(key: CacheKey, sequence: Option<String>) -> Self {
        Self { key, sequence }
    }

    // == Composite Key ==
    /// Returns the composite key this task is addressed by.
    pub fn composite_key(&self) -> String {
        self.key.composite()
    }
}

// == Lease Record ==
/// Records a task checked out to a worker and when it was handed over.
///
/// Presence in the lease table means "checked out, not yet resolved or
/// re-queued." The task rides along so an expired lease can be re-queued.
#[derive(Debug, Clone)]
pub struct LeaseRecord {
    /// The leased task
    pub task: TaskEntry,
    /// When the task was handed to a worker (Unix milliseconds)
    pub leased_at_ms: u64,
}
