//! HTTP peer pool: the consistent-hash ring plus one client per peer.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::protocol::{normalize_base_path, DEFAULT_BASE_PATH};
use super::{HttpGetter, PeerGetter, PeerPicker};
use crate::ring::{HashRing, DEFAULT_REPLICAS};

#[derive(Debug, Default)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer membership of one node.
///
/// `self_addr` and every peer are base addresses such as
/// `http://10.0.0.1:8001`; keys owned by `self_addr` are never fetched
/// over the network.
#[derive(Debug)]
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    replicas: usize,
    timeout: Option<Duration>,
    client: Client,
    state: RwLock<PoolState>,
}

impl HttpPool {
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self {
            self_addr: self_addr.into().trim_end_matches('/').to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            timeout: None,
            client: Client::new(),
            state: RwLock::new(PoolState::default()),
        }
    }

    /// Sets the path prefix peers serve reads under.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    /// Sets the number of virtual nodes per peer.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Bounds every remote fetch.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    // == Set Peers ==
    /// Replaces the peer set, rebuilding the ring and the clients.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();

        let mut ring = HashRing::new(self.replicas, None);
        ring.set_peers(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    format!("{}{}", peer, self.base_path),
                    self.client.clone(),
                    self.timeout,
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = PoolState { ring, getters };
        info!("[Server {}] peer set updated: {:?}", self.self_addr, peers);
    }

    /// Returns the configured peers, sorted.
    pub fn peers(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let mut peers: Vec<String> = state.getters.keys().cloned().collect();
        peers.sort();
        peers
    }

    /// Returns the peer address owning `key`, which may be this node.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.ring.locate(key).map(str::to_string)
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let peer = state.ring.locate(key)?;
        if peer == self.self_addr {
            return None;
        }
        debug!("[Server {}] pick peer {}", self.self_addr, peer);
        let getter: Arc<dyn PeerGetter> = state.getters.get(peer)?.clone();
        Some(getter)
    }
}
