//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single materialized result stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored value payload
    pub value: String,
    /// Producer-supplied quality signal, no engine-enforced range
    pub confidence: Option<f64>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `confidence` - Optional confidence score reported by the producer
    pub fn new(value: String, confidence: Option<f64>) -> Self {
        Self {
            value,
            confidence,
            created_at: current_timestamp_ms(),
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.confidence.is_none());
        assert!(entry.created_at > 0);
    }

    #[test]
    fn test_entry_with_confidence() {
        let entry = CacheEntry::new("test_value".to_string(), Some(0.92));

        assert_eq!(entry.confidence, Some(0.92));
    }

    #[test]
    fn test_timestamps_are_monotonic_enough() {
        let a = current_timestamp_ms();
        let b = current_timestamp_ms();
        assert!(b >= a);
    }
}
