//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::error::{CacheError, Result};
use crate::peers::protocol::{normalize_base_path, DEFAULT_BASE_PATH};
use crate::ring::DEFAULT_REPLICAS;

const DEFAULT_NODE_ADDR: &str = "http://localhost:8001";
const DEFAULT_GROUP_NAME: &str = "scores";
const DEFAULT_CACHE_BYTES: usize = 2 << 10;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// This node's base address, also its identity on the ring
    pub node_addr: String,
    /// Every node of the cluster, this one included
    pub peers: Vec<String>,
    /// Name of the group this node serves
    pub group_name: String,
    /// Byte capacity of the group's local partition, 0 = unbounded
    pub cache_bytes: usize,
    /// Prefix of the peer endpoint
    pub base_path: String,
    /// Virtual nodes per peer on the ring
    pub replicas: usize,
    /// Remote fetch timeout in milliseconds, 0 = unbounded
    pub peer_timeout_ms: u64,
    /// Whether `/api` is served on the node router
    pub api_enabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NODE_ADDR` - This node's base address (default: http://localhost:8001)
    /// - `PEERS` - Comma separated base addresses (default: NODE_ADDR)
    /// - `GROUP_NAME` - Served group (default: scores)
    /// - `CACHE_BYTES` - Local partition capacity (default: 2048)
    /// - `BASE_PATH` - Peer endpoint prefix (default: /_geecache/)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `PEER_TIMEOUT_MS` - Remote fetch timeout (default: 0, unbounded)
    /// - `API_ENABLED` - Serve `/api`: true/false, 1/0, yes/no, on/off (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let node_addr = env::var("NODE_ADDR").unwrap_or(defaults.node_addr);
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![node_addr.clone()]);

        Self {
            node_addr,
            peers,
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            base_path: env::var("BASE_PATH")
                .map(|v| normalize_base_path(&v))
                .unwrap_or(defaults.base_path),
            replicas: parse_var("REPLICAS").unwrap_or(defaults.replicas),
            peer_timeout_ms: parse_var("PEER_TIMEOUT_MS").unwrap_or(defaults.peer_timeout_ms),
            api_enabled: env::var("API_ENABLED")
                .ok()
                .and_then(|v| parse_flag("API_ENABLED", &v))
                .unwrap_or(defaults.api_enabled),
        }
    }

    /// Socket address to listen on, taken from the host and port of `node_addr`.
    pub fn bind_addr(&self) -> Result<String> {
        let url = Url::parse(&self.node_addr)
            .map_err(|e| CacheError::Internal(format!("invalid NODE_ADDR {}: {}", self.node_addr, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| CacheError::Internal(format!("NODE_ADDR {} has no host", self.node_addr)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| CacheError::Internal(format!("NODE_ADDR {} has no port", self.node_addr)))?;

        Ok(format!("{}:{}", host, port))
    }

    pub fn peer_timeout(&self) -> Option<Duration> {
        (self.peer_timeout_ms > 0).then(|| Duration::from_millis(self.peer_timeout_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_addr: DEFAULT_NODE_ADDR.to_string(),
            peers: vec![DEFAULT_NODE_ADDR.to_string()],
            group_name: DEFAULT_GROUP_NAME.to_string(),
            cache_bytes: DEFAULT_CACHE_BYTES,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            peer_timeout_ms: 0,
            api_enabled: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(name: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("ignoring {}={:?}, expected a boolean", name, value);
            None
        }
    }
}

fn parse_peers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(String::from)
        .collect()
}
