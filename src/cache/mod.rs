//! Cache Module
//!
//! Provides the byte-bounded local cache partition with LRU eviction.

mod byteview;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use lru::LruTracker;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{EvictionCallback, LruCache};
