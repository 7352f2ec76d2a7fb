//! Peercache node - serves one cache group to its peers
//!
//! Boots a single node of a peercache cluster backed by a small in-memory
//! score table standing in for a slow database.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peercache::{create_router, AppState, Config, GroupRegistry, HttpPool, LoadError};

/// Main entry point for a peercache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the served group with its loader
/// 4. Register the peer pool with the group
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on the node address
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting peercache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: node={}, peers={:?}, group={}, cache_bytes={}, replicas={}",
        config.node_addr, config.peers, config.group_name, config.cache_bytes, config.replicas
    );

    let registry = Arc::new(GroupRegistry::new());
    let db = score_table();
    let group = registry.create(&config.group_name, config.cache_bytes, move |key: &str| {
        info!("[SlowDB] search key {}", key);
        db.get(key)
            .map(|score| score.as_bytes().to_vec())
            .ok_or_else(|| LoadError::NotFound(key.to_string()))
    })?;

    let pool = HttpPool::new(&config.node_addr)
        .with_base_path(&config.base_path)
        .with_replicas(config.replicas)
        .with_timeout(config.peer_timeout());
    pool.set_peers(&config.peers);
    group.register_peers(Arc::new(pool))?;

    let mut state = AppState::new(registry, &config.node_addr).with_base_path(&config.base_path);
    if config.api_enabled {
        state = state.with_api_group(&config.group_name);
        info!("Front-end api enabled for group {}", config.group_name);
    }
    let app = create_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("peercache is running at {}", config.node_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn score_table() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
