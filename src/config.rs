//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the store can hold
    pub capacity: usize,
    /// Per-entry serialized value size ceiling in bytes
    pub max_entry_size_bytes: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Raw socket transport port
    pub tcp_port: u16,
    /// Submit a compute task whenever a `get` misses
    pub submit_on_miss: bool,
    /// Lease only tasks matching the requested model
    pub lease_filter_by_model: bool,
    /// Re-queue leases older than this many seconds; 0 disables reclaim
    pub lease_reclaim_secs: u64,
    /// Background reclaim cadence in seconds (used only when reclaim is on)
    pub reclaim_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum store entries (default: 1000)
    /// - `MAX_ENTRY_SIZE_BYTES` - Value size ceiling (default: 1048576)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `TCP_PORT` - Socket transport port (default: 6379)
    /// - `SUBMIT_ON_MISS` - Get-miss submits a task (default: false)
    /// - `LEASE_FILTER_BY_MODEL` - Model-filtered leasing (default: false)
    /// - `LEASE_RECLAIM_SECS` - Lease reclaim threshold, 0 = off (default: 0)
    /// - `RECLAIM_INTERVAL_SECS` - Reclaim cadence (default: 5)
    pub fn from_env() -> Self {
        Self {
            capacity: parse_env("CACHE_CAPACITY").unwrap_or(1000),
            max_entry_size_bytes: parse_env("MAX_ENTRY_SIZE_BYTES").unwrap_or(1024 * 1024),
            server_port: parse_env("SERVER_PORT").unwrap_or(3000),
            tcp_port: parse_env("TCP_PORT").unwrap_or(6379),
            submit_on_miss: flag_env("SUBMIT_ON_MISS"),
            lease_filter_by_model: flag_env("LEASE_FILTER_BY_MODEL"),
            lease_reclaim_secs: parse_env("LEASE_RECLAIM_SECS").unwrap_or(0),
            reclaim_interval_secs: parse_env("RECLAIM_INTERVAL_SECS").unwrap_or(5),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            max_entry_size_bytes: 1024 * 1024,
            server_port: 3000,
            tcp_port: 6379,
            submit_on_miss: false,
            lease_filter_by_model: false,
            lease_reclaim_secs: 0,
            reclaim_interval_secs: 5,
        }
    }
}

// == Env Helpers ==
fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn flag_env(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
