//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies. Key validation
//! lives in [`CacheKey`]; each request type exposes a `cache_key` helper so
//! malformed identifiers are rejected before reaching the engine.

use serde::Deserialize;

use crate::cache::CacheKey;
use crate::error::{CacheError, Result};

/// Request body for the PUT operation (PUT /put)
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// Content fingerprint of the input
    pub hash: String,
    /// Optional computation variant identifier
    #[serde(default)]
    pub model_id: Option<String>,
    /// The value to store
    pub value: String,
    /// Optional producer-supplied confidence score
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl PutRequest {
    /// Builds the validated composite key for this request.
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::new(self.hash.clone(), self.model_id.clone())
    }
}

/// Query parameters for the GET operation (GET /get)
#[derive(Debug, Clone, Deserialize)]
pub struct GetParams {
    /// Content fingerprint of the input
    pub hash: String,
    /// Optional computation variant identifier
    #[serde(default)]
    pub model_id: Option<String>,
}

impl GetParams {
    /// Builds the validated composite key for this request.
    pub fn cache_key(&self) -> Result<CacheKey> {
        CacheKey::new(self.hash.clone(), self.model_id.clone())
    }
}

/// Request body for task submission (POST /tasks/submit)
///
/// `model_id` is required here: a task must name the computation variant
/// that will consume it.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTaskRequest {
    /// Content fingerprint of the input
    pub hash: String,
    /// Computation variant that should run this task
    pub model_id: String,
    /// Optional producer payload / version tag
    #[serde(default)]
    pub sequence: Option<String>,
}

impl SubmitTaskRequest {
    /// Builds the validated composite key for this request.
    pub fn cache_key(&self) -> Result<CacheKey> {
        if self.model_id.is_empty() {
            return Err(CacheError::InvalidRequest(
                "model_id is required".to_string(),
            ));
        }
        CacheKey::new(self.hash.clone(), Some(self.model_id.clone()))
    }
}

/// Request body for leasing tasks (POST /tasks/lease)
#[derive(Debug, Clone, Deserialize)]
pub struct LeaseRequest {
    /// Maximum number of tasks to check out
    pub max_batch_size: usize,
    /// Optional model filter (honored per the configured lease policy)
    #[serde(default)]
    pub target_model_id: Option<String>,
}

/// One computed result inside a batch submission
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEntry {
    /// Content fingerprint the result belongs to
    pub hash: String,
    /// The computed value
    pub value: String,
    /// Optional producer-supplied confidence score
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Request body for batch result submission (POST /batch)
///
/// The model identifier is supplied once for the whole batch; each entry is
/// applied as a `put` followed by a `resolveTask`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    /// Computation variant that produced every result in the batch
    pub model_id: String,
    /// Computed results
    pub results: Vec<BatchEntry>,
}

impl BatchRequest {
    /// Validates the batch-level fields.
    pub fn validate(&self) -> Option<String> {
        if self.model_id.is_empty() {
            return Some("model_id is required".to_string());
        }
        None
    }
}
