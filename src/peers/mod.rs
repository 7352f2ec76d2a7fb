//! Peers Module
//!
//! Capabilities a group uses to reach the peer that owns a key, and their
//! HTTP implementation.
//!
//! - [`PeerPicker`] decides which peer owns a key
//! - [`PeerGetter`] fetches a group's value from one peer

mod client;
mod pool;
pub mod protocol;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpGetter;
pub use pool::HttpPool;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or None when the local node owns `key`
    /// (or no peers are configured).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches cached values from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;

    /// Address used in logs.
    fn addr(&self) -> &str;
}
