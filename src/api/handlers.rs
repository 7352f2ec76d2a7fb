//! API Handlers
//!
//! HTTP request handlers for peer reads, the front-end read, stats and health.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{ApiQuery, GroupStatsResponse, HealthResponse, PeerQuery, StatsResponse};
use crate::peers::protocol::{self, normalize_base_path, DEFAULT_BASE_PATH};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups this node serves
    pub registry: Arc<GroupRegistry>,
    /// This node's base address, used in logs
    pub node: String,
    /// Prefix of the peer endpoint, starting and ending with `/`
    pub base_path: String,
    /// Group exposed on `/api`; None disables the front-end read
    pub api_group: Option<String>,
}

impl AppState {
    /// Creates a state serving `registry` under the default base path.
    pub fn new(registry: Arc<GroupRegistry>, node: impl Into<String>) -> Self {
        Self {
            registry,
            node: node.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            api_group: None,
        }
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    /// Exposes `group` on the front-end `/api` endpoint.
    pub fn with_api_group(mut self, group: impl Into<String>) -> Self {
        self.api_group = Some(group.into());
        self
    }
}

/// Handler for GET <base_path><group>/<key>
///
/// Serves a group's value to another peer as an encoded protocol response.
/// Also answers GET <base_path><group>?key=<key> for dot keys.
pub async fn peer_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<PeerQuery>,
) -> Result<Response> {
    info!("[Server {}] GET {}{}", state.node, state.base_path, path);

    let (group_name, key) = match (path.split_once('/'), query.key.as_deref()) {
        (Some(parts), _) => parts,
        (None, Some(key)) => (path.as_str(), key),
        (None, None) => {
            return Err(CacheError::BadRequest(format!(
                "expected <group>/<key>, got {}",
                path
            )))
        }
    };

    let group = state
        .registry
        .lookup(group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.to_string()))?;

    let view = group.get(key).await?;
    let body = protocol::Response::new(view.byte_slice()).encode()?;

    Ok(([(header::CONTENT_TYPE, protocol::CONTENT_TYPE)], body).into_response())
}

/// Handler for GET /api?key=<key>
///
/// Returns the raw value bytes of the configured front-end group.
pub async fn api_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let name = state
        .api_group
        .as_deref()
        .ok_or_else(|| CacheError::GroupNotFound("front-end group not configured".into()))?;
    let group = state
        .registry
        .lookup(name)
        .ok_or_else(|| CacheError::GroupNotFound(name.to_string()))?;

    let view = group.get(&query.key).await?;

    Ok(([(header::CONTENT_TYPE, protocol::CONTENT_TYPE)], view.byte_slice()).into_response())
}

/// Handler for GET /stats
///
/// Returns statistics of every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut groups = Vec::new();
    for name in state.registry.names() {
        if let Some(group) = state.registry.lookup(&name) {
            groups.push(GroupStatsResponse::from(group.stats().await));
        }
    }

    Json(StatsResponse {
        node: state.node.clone(),
        groups,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
