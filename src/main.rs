//! Playhub Server: real-time connection layer for the game platform.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};

use playhub_api::{AppState, build_app};
use playhub_cache::RecordCache;
use playhub_core::config::AppConfig;
use playhub_core::error::AppError;
use playhub_realtime::{CacheSessionStore, CommandRegistry, RealtimeEngine, SessionStore};
use playhub_upstream::UpstreamClient;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PLAYHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Playhub v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Step 1: Session records + store ──────────────────────────
    tracing::info!("Opening session records (backend: {})...", config.cache.backend);
    let records = RecordCache::open(&config.cache).await?;
    let sessions: Arc<dyn SessionStore> = Arc::new(CacheSessionStore::new(
        records.clone(),
        config.realtime.session_ttl(),
    ));

    // ── Step 2: Upstream bridge ──────────────────────────────────
    let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);
    tracing::info!("Upstream bridge targets {}", config.upstream.base_url);

    // ── Step 3: Commands + engine ────────────────────────────────
    let commands = build_commands(upstream);
    let engine = RealtimeEngine::new(config.realtime.clone(), sessions, commands);

    // ── Step 4: Build and start HTTP server ──────────────────────
    let state = AppState::new(Arc::clone(&config), records, engine.clone());
    let app = build_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Playhub server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Shutdown signal received, closing sockets...");
    let closed = engine.shutdown();
    if closed > 0 {
        tokio::time::sleep(Duration::from_secs(config.server.shutdown_grace_seconds)).await;
    }

    tracing::info!("Playhub server shut down gracefully");
    Ok(())
}

/// Commands served over the socket.
fn build_commands(upstream: Arc<UpstreamClient>) -> CommandRegistry {
    CommandRegistry::builder()
        .register_fn("ping", |conn, _data| async move {
            conn.success("pong", &json!({ "ts": chrono::Utc::now().timestamp_millis() }))
                .await;
            Ok(())
        })
        .register_fn(playhub_realtime::command::OFFLINE_COMMAND, move |conn, _data| {
            let upstream = Arc::clone(&upstream);
            async move {
                let Some(user_id) = conn.user_id() else {
                    return Ok(());
                };
                tracing::info!(user_id = %user_id, conn_id = %conn.id(), "User went offline");
                upstream
                    .post("/user/offline", &json!({ "uid": user_id.as_str() }))
                    .await?;
                Ok(())
            }
        })
        .build()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
