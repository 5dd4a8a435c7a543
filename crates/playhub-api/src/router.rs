//! Route definitions.

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::state::AppState;

/// Builds the router: the socket upgrade at `/ws`, everything else under
/// `/api`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/health", get(handlers::health::health));

    Router::new()
        .route("/ws", get(handlers::ws::ws_upgrade))
        .nest("/api", api_routes)
        .with_state(state)
}
