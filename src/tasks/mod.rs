//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Lease Reclaim: re-queues stuck leases at configured intervals (opt-in)

mod reclaim;

pub use reclaim::spawn_reclaim_task;
