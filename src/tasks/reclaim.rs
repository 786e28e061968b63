//! Lease Reclaim Task
//!
//! Background task that periodically re-queues leases held longer than a
//! configured threshold. This is an opt-in extension: the baseline ledger
//! never reclaims, so a lease whose worker crashed stays checked out until
//! `clear`. Enabling reclaim trades that gap for at-least-once delivery
//! (a slow worker's task may be recomputed by another).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::CacheEngine;

/// Spawns a background task that periodically reclaims expired leases.
///
/// The task runs in an infinite loop, sleeping for the configured interval
/// between reclaim runs. Leases older than `max_age_secs` are moved back to
/// the queue tail.
///
/// # Arguments
/// * `engine` - Shared engine reference
/// * `interval_secs` - Seconds between reclaim runs
/// * `max_age_secs` - Lease age threshold in seconds
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_reclaim_task(
    engine: Arc<CacheEngine>,
    interval_secs: u64,
    max_age_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);
    let max_age_ms = max_age_secs.saturating_mul(1000);

    tokio::spawn(async move {
        info!(
            "Starting lease reclaim task: interval {}s, max lease age {}s",
            interval_secs, max_age_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let reclaimed = engine.reclaim_expired_leases(max_age_ms);

            if reclaimed > 0 {
                info!("Lease reclaim: re-queued {} expired leases", reclaimed);
            } else {
                debug!("Lease reclaim: no expired leases found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKey;

    fn engine_with_lease() -> Arc<CacheEngine> {
        let engine = Arc::new(CacheEngine::new(100, 1024, false, false));
        let key = CacheKey::new("h1", Some("m1".to_string())).unwrap();
        engine.submit_task(key, Some("seq".to_string()));
        engine.lease_tasks(10, None);
        engine
    }

    #[tokio::test]
    async fn test_reclaim_task_requeues_expired_leases() {
        let engine = engine_with_lease();

        // Threshold 0: every lease is immediately expired
        let handle = spawn_reclaim_task(Arc::clone(&engine), 1, 0);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let stats = engine.stats();
        assert_eq!(stats.active_leases, 0);
        assert_eq!(stats.queued_tasks, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_reclaim_task_preserves_fresh_leases() {
        let engine = engine_with_lease();

        let handle = spawn_reclaim_task(Arc::clone(&engine), 1, 3600);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let stats = engine.stats();
        assert_eq!(stats.active_leases, 1);
        assert_eq!(stats.queued_tasks, 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_reclaim_task_can_be_aborted() {
        let engine = Arc::new(CacheEngine::new(100, 1024, false, false));

        let handle = spawn_reclaim_task(engine, 1, 60);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
