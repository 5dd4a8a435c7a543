//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use playhub_core::traits::SessionRecords;

use crate::state::AppState;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Live socket connections.
    pub connections: usize,
    /// Users with a live connection.
    pub users: usize,
    /// Whether the session record backend answered.
    pub cache: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let hub = state.engine.hub();
    let cache = state.records.ping().await.is_ok();

    Json(HealthResponse {
        status: "ok".to_string(),
        connections: hub.connection_count(),
        users: hub.user_count(),
        cache,
    })
}
