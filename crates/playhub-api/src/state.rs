//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use playhub_auth::jwt::HandshakeDecoder;
use playhub_cache::RecordCache;
use playhub_core::config::AppConfig;
use playhub_realtime::RealtimeEngine;
use playhub_realtime::connection::WsAuthenticator;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Record backend behind the session store
    pub records: RecordCache,
    /// Handshake authenticator for socket upgrades
    pub authenticator: WsAuthenticator,
    /// Real-time engine owning every live connection
    pub engine: RealtimeEngine,
}

impl AppState {
    /// Assembles the state, deriving the authenticator from `config.auth`.
    pub fn new(config: Arc<AppConfig>, records: RecordCache, engine: RealtimeEngine) -> Self {
        let decoder = Arc::new(HandshakeDecoder::new(&config.auth));
        let authenticator = WsAuthenticator::new(decoder, config.auth.require_token);
        Self {
            config,
            records,
            authenticator,
            engine,
        }
    }
}
