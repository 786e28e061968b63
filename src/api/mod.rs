//! API Module
//!
//! HTTP handlers and routing for the cache server RPC façade.
//!
//! # Endpoints
//! - `PUT /put` - Store a value under its composite key
//! - `GET /get` - Retrieve a value by composite key fields
//! - `POST /tasks/submit` - Register pending work
//! - `POST /tasks/lease` - Check out a batch of tasks
//! - `POST /batch` - Apply worker results
//! - `POST /clear` - Reset store, queue and leases
//! - `GET /stats` - Engine statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
