//! Group Orchestrator
//!
//! A group is one cache namespace: a local LRU partition, the loader that
//! fills it, and optionally the peers that share the key space.
//!
//! # Get Flow
//! 1. Empty key -> rejected
//! 2. Local cache hit -> returned
//! 3. Miss -> single-flight on the key, then either
//!    - fetch from the owning peer (kept locally as a replica), or
//!    - on no remote owner or any remote failure, call the loader once

use std::sync::{Arc, OnceLock};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::Getter;
use crate::cache::{ByteView, CacheStats, LruCache, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::SingleFlight;

// == Group ==
pub struct Group {
    name: String,
    /// Runs on the blocking pool, never on a runtime worker
    getter: Arc<dyn Getter>,
    /// Local partition; `get` takes the write lock because hits reorder it
    main_cache: RwLock<LruCache>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: SingleFlight<ByteView>,
    stats: Arc<CacheStats>,
}

/// Group counters plus the current size of its local partition.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub name: String,
    pub counters: StatsSnapshot,
    pub entries: usize,
    pub bytes: usize,
    pub capacity: usize,
}

impl Group {
    /// Creates a group holding at most `cache_bytes` bytes locally
    /// (0 = unbounded).
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: impl Getter + 'static) -> Self {
        let stats = Arc::new(CacheStats::new());
        let evictions = stats.clone();
        let main_cache =
            LruCache::with_eviction_callback(cache_bytes, move |_, _| evictions.record_eviction());

        Self {
            name: name.into(),
            getter: Arc::new(getter),
            main_cache: RwLock::new(main_cache),
            peers: OnceLock::new(),
            loader: SingleFlight::new(),
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Attaches the peer picker. Allowed once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        let cached = self.main_cache.write().await.get(key);
        if let Some(value) = cached {
            self.stats.record_hit();
            debug!("[{}] cache hit for {}", self.name, key);
            return Ok(value);
        }

        self.stats.record_miss();
        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.loader
            .run(key, || async {
                if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => return Ok(value),
                        Err(err) => {
                            self.stats.record_peer_error();
                            warn!(
                                "[{}] failed to get {} from peer {}: {}",
                                self.name,
                                key,
                                peer.addr(),
                                err
                            );
                        }
                    }
                }
                self.get_locally(key).await
            })
            .await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        let value = ByteView::from(bytes);
        self.stats.record_peer_load();
        self.populate_cache(key, value.clone()).await;
        Ok(value)
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let getter = self.getter.clone();
        let owned_key = key.to_string();
        let bytes = tokio::task::spawn_blocking(move || getter.get(&owned_key))
            .await
            .map_err(|e| CacheError::Internal(format!("loader for {} failed: {}", key, e)))??;
        let value = ByteView::from(bytes);
        self.stats.record_load();
        info!("[{}] loaded {} locally", self.name, key);
        self.populate_cache(key, value.clone()).await;
        Ok(value)
    }

    async fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.write().await.add(key, value);
    }

    // == Stats ==
    pub async fn stats(&self) -> GroupStats {
        let cache = self.main_cache.read().await;
        GroupStats {
            name: self.name.clone(),
            counters: self.stats.snapshot(),
            entries: cache.len(),
            bytes: cache.bytes(),
            capacity: cache.capacity(),
        }
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("peers", &self.peers.get().is_some())
            .finish()
    }
}
