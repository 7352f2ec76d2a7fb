//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

use crate::group::GroupStats;

/// Statistics of one group (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    pub name: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Values produced by the local loader
    pub loads: u64,
    /// Values fetched from owning peers
    pub peer_loads: u64,
    /// Failed remote fetches
    pub peer_errors: u64,
    /// Current number of entries in the local partition
    pub entries: usize,
    /// Current weight of the local partition in bytes
    pub bytes: usize,
    /// Byte capacity, 0 = unbounded
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<GroupStats> for GroupStatsResponse {
    fn from(stats: GroupStats) -> Self {
        let hit_rate = stats.counters.hit_rate();
        Self {
            name: stats.name,
            hits: stats.counters.hits,
            misses: stats.counters.misses,
            evictions: stats.counters.evictions,
            loads: stats.counters.loads,
            peer_loads: stats.counters.peer_loads,
            peer_errors: stats.counters.peer_errors,
            entries: stats.entries,
            bytes: stats.bytes,
            capacity: stats.capacity,
            hit_rate,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// This node's base address
    pub node: String,
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
