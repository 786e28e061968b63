//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::engine::EngineStats;
use crate::ledger::TaskEntry;

/// Response body for the GET operation (GET /get)
///
/// Absence is a normal outcome: a miss is `found: false`, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Whether the key was found
    pub found: bool,
    /// The composite key that was looked up
    pub key: String,
    /// The stored value, when found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The stored confidence score, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl GetResponse {
    /// Creates a hit response.
    pub fn hit(key: impl Into<String>, value: String, confidence: Option<f64>) -> Self {
        Self {
            found: true,
            key: key.into(),
            value: Some(value),
            confidence,
        }
    }

    /// Creates a miss response.
    pub fn miss(key: impl Into<String>) -> Self {
        Self {
            found: false,
            key: key.into(),
            value: None,
            confidence: None,
        }
    }
}

/// Response body for the PUT operation (PUT /put)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The composite key that was stored
    pub key: String,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored", key),
            key,
        }
    }
}

/// Response body for task submission (POST /tasks/submit)
#[derive(Debug, Clone, Serialize)]
pub struct SubmitTaskResponse {
    /// Outcome message
    pub message: String,
    /// The composite key of the task
    pub key: String,
    /// True if a new task was enqueued, false if the key was already known
    pub queued: bool,
}

impl SubmitTaskResponse {
    /// Creates a new SubmitTaskResponse
    pub fn new(key: impl Into<String>, queued: bool) -> Self {
        let key = key.into();
        let message = if queued {
            format!("Task '{}' queued", key)
        } else {
            format!("Task '{}' already known", key)
        };
        Self {
            message,
            key,
            queued,
        }
    }
}

/// One leased task as returned to a worker
#[derive(Debug, Clone, Serialize)]
pub struct TaskDto {
    /// Content fingerprint of the input
    pub hash: String,
    /// Computation variant that should run this task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Producer payload / version tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

impl From<TaskEntry> for TaskDto {
    fn from(task: TaskEntry) -> Self {
        Self {
            hash: task.key.hash,
            model_id: task.key.model_id,
            sequence: task.sequence,
        }
    }
}

/// Response body for leasing tasks (POST /tasks/lease)
#[derive(Debug, Clone, Serialize)]
pub struct LeaseResponse {
    /// The leased batch, in FIFO order
    pub tasks: Vec<TaskDto>,
    /// Number of tasks in the batch
    pub count: usize,
}

impl LeaseResponse {
    /// Creates a new LeaseResponse from a leased batch
    pub fn new(batch: Vec<TaskEntry>) -> Self {
        let tasks: Vec<TaskDto> = batch.into_iter().map(TaskDto::from).collect();
        let count = tasks.len();
        Self { tasks, count }
    }
}

/// Response body for batch result submission (POST /batch)
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    /// Outcome message
    pub message: String,
    /// Number of results written to the store
    pub stored: usize,
    /// Number of results rejected for exceeding the entry size ceiling
    pub rejected: usize,
}

impl BatchResponse {
    /// Creates a new BatchResponse
    pub fn new(stored: usize, rejected: usize) -> Self {
        Self {
            message: format!("Batch processed: {} stored, {} rejected", stored, rejected),
            stored,
            rejected,
        }
    }
}

/// Response body for the clear operation (POST /clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new() -> Self {
        Self {
            message: "Store, queue and leases cleared".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of writes rejected for size
    pub rejected: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Tasks waiting in the queue
    pub queued_tasks: usize,
    /// Tasks checked out to workers
    pub active_leases: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from an engine snapshot
    pub fn new(stats: EngineStats) -> Self {
        Self {
            hits: stats.store.hits,
            misses: stats.store.misses,
            evictions: stats.store.evictions,
            rejected: stats.store.rejected,
            total_entries: stats.store.total_entries,
            hit_rate: stats.store.hit_rate(),
            queued_tasks: stats.queued_tasks,
            active_leases: stats.active_leases,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CacheStats};

    #[test]
    fn test_get_response_hit_serialize() {
        let resp = GetResponse::hit("abc:m1", "value".to_string(), Some(0.9));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"found\":true"));
        assert!(json.contains("value"));
        assert!(json.contains("0.9"));
    }

    #[test]
    fn test_get_response_miss_omits_value() {
        let resp = GetResponse::miss("abc:m1");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"found\":false"));
        assert!(!json.contains("\"value\""));
    }

    #[test]
    fn test_task_dto_from_entry() {
        let key = CacheKey::new("abc", Some("m1".to_string())).unwrap();
        let dto = TaskDto::from(TaskEntry::new(key, Some("seq".to_string())));
        assert_eq!(dto.hash, "abc");
        assert_eq!(dto.model_id.as_deref(), Some("m1"));
        assert_eq!(dto.sequence.as_deref(), Some("seq"));
    }

    #[test]
    fn test_lease_response_count() {
        let key = CacheKey::new("abc", Some("m1".to_string())).unwrap();
        let resp = LeaseResponse::new(vec![TaskEntry::new(key, None)]);
        assert_eq!(resp.count, 1);
        assert_eq!(resp.tasks.len(), 1);
    }

    #[test]
    fn test_batch_response_message() {
        let resp = BatchResponse::new(3, 1);
        assert!(resp.message.contains("3 stored"));
        assert!(resp.message.contains("1 rejected"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = EngineStats {
            store: CacheStats {
                hits: 80,
                misses: 20,
                evictions: 5,
                rejected: 0,
                total_entries: 100,
            },
            queued_tasks: 2,
            active_leases: 1,
        };
        let resp = StatsResponse::new(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.queued_tasks, 2);
        assert_eq!(resp.active_leases, 1);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
