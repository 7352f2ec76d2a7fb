//! API Routes
//!
//! Configures the Axum router with all cache node endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_handler, health_handler, peer_handler, stats_handler, AppState};

/// Creates the node router.
///
/// # Endpoints
/// - `GET <base_path><group>/<key>` - Peer read (bincode body)
/// - `GET <base_path><group>?key=<key>` - Peer read of a `.` or `..` key
/// - `GET /api?key=<key>` - Front-end read, only if an api group is set
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route(&format!("{}*path", state.base_path), get(peer_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler));

    if state.api_group.is_some() {
        router = router.route("/api", get(api_handler));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
