//! Ledger Module
//!
//! Deduplicating FIFO work queue plus lease bookkeeping for tasks handed to
//! external workers.

mod queue;
mod task;

// Re-export public types
pub use queue::TaskLedger;
pub use task::{LeaseRecord, TaskEntry};
