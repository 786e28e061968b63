//! Cache Module
//!
//! Composite-key addressing and the bounded LRU eviction store.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::{CacheKey, KEY_SEPARATOR};
pub use lru::{LruList, Slot};
pub use stats::CacheStats;
pub use store::{EvictionStore, PutOutcome};

// == Public Constants ==
/// Maximum allowed composite key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
