//! Peercache - A distributed read-through cache
//!
//! Values are loaded on miss by a user supplied getter, kept in a weighted LRU
//! and partitioned across nodes with a consistent hash ring. Concurrent misses
//! for the same key share a single load.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;
pub mod singleflight;

pub use api::{create_router, AppState};
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, LoadError, Result};
pub use group::{Getter, Group, GroupRegistry};
pub use peers::{HttpGetter, HttpPool, PeerGetter, PeerPicker};
pub use ring::HashRing;
pub use singleflight::SingleFlight;
