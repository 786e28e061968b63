//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers marshal
//! parameters into engine operations and marshal results back out; the
//! engine provides all thread-safety.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::{CacheKey, PutOutcome};
use crate::engine::CacheEngine;
use crate::error::{CacheError, Result};
use crate::models::{
    BatchRequest, BatchResponse, ClearResponse, GetParams, GetResponse, HealthResponse,
    LeaseRequest, LeaseResponse, PutRequest, PutResponse, StatsResponse, SubmitTaskRequest,
    SubmitTaskResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shared cache-and-task engine
    pub engine: Arc<CacheEngine>,
}

impl AppState {
    /// Creates a new AppState around an engine.
    pub fn new(engine: CacheEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheEngine::from_config(config))
    }
}

/// Handler for PUT /put
///
/// Stores a value under its composite key. An oversized value is a client
/// error at this boundary; the engine itself only reports a sentinel.
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    let key = req.cache_key()?;

    match state.engine.put(&key, req.value, req.confidence) {
        PutOutcome::Stored => Ok(Json(PutResponse::new(key.composite()))),
        PutOutcome::Rejected => Err(CacheError::ValueTooLarge(format!(
            "Value for key '{}' exceeds the entry size ceiling",
            key
        ))),
    }
}

/// Handler for GET /get
///
/// Looks up a composite key. A miss is a normal `found: false` response;
/// with submit-on-miss configured it also registers a compute task.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(params): Query<GetParams>,
) -> Result<Json<GetResponse>> {
    let key = params.cache_key()?;

    let response = match state.engine.get(&key) {
        Some(entry) => GetResponse::hit(key.composite(), entry.value, entry.confidence),
        None => GetResponse::miss(key.composite()),
    };
    Ok(Json(response))
}

/// Handler for POST /tasks/submit
///
/// Registers pending work. Submission is idempotent: a key already stored,
/// queued, or leased leaves the ledger untouched.
pub async fn submit_task_handler(
    State(state): State<AppState>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<Json<SubmitTaskResponse>> {
    let key = req.cache_key()?;
    let composite = key.composite();

    let queued = state.engine.submit_task(key, req.sequence);
    Ok(Json(SubmitTaskResponse::new(composite, queued)))
}

/// Handler for POST /tasks/lease
///
/// Checks out a FIFO batch of tasks for a worker. Never blocks: an empty
/// queue yields an empty batch.
pub async fn lease_tasks_handler(
    State(state): State<AppState>,
    Json(req): Json<LeaseRequest>,
) -> Json<LeaseResponse> {
    let batch = state
        .engine
        .lease_tasks(req.max_batch_size, req.target_model_id.as_deref());
    Json(LeaseResponse::new(batch))
}

/// Handler for POST /batch
///
/// Applies a worker's computed results: `put` then `resolveTask` per entry,
/// with the model identifier supplied once for the whole batch. An oversized
/// entry is counted as rejected but still resolves its lease.
pub async fn submit_batch_handler(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut stored = 0;
    let mut rejected = 0;
    for entry in req.results {
        let key = CacheKey::new(entry.hash, Some(req.model_id.clone()))?;

        match state.engine.put(&key, entry.value, entry.confidence) {
            PutOutcome::Stored => stored += 1,
            PutOutcome::Rejected => rejected += 1,
        }
        state.engine.resolve_task(&key);
    }

    Ok(Json(BatchResponse::new(stored, rejected)))
}

/// Handler for POST /clear
///
/// Empties the store, the queue and the lease table.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.engine.clear();
    Json(ClearResponse::new())
}

/// Handler for GET /stats
///
/// Returns current engine statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.engine.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
