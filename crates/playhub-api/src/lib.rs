//! # playhub-api
//!
//! HTTP layer for Playhub built on Axum.
//!
//! Serves the `GET /ws` socket upgrade, which authenticates the handshake
//! token and hands the socket to the real-time engine, and the health
//! endpoint under `/api`.

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
