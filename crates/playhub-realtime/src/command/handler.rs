//! Command handler trait and a closure adapter.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use playhub_core::result::AppResult;

use crate::connection::Connection;

/// Application logic bound to one command name.
///
/// Handlers receive the originating connection and may push back to it or
/// to other users through the hub. An `Err` is sent to the peer as an error
/// envelope for the same command; the connection stays open.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    /// Handles one inbound command.
    async fn handle(&self, conn: Arc<Connection>, data: Value) -> AppResult<()>;
}

/// Adapts an async closure into a [`CommandHandler`].
pub struct FnHandler<F>(F);

impl<F> FnHandler<F> {
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnHandler")
    }
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(Arc<Connection>, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AppResult<()>> + Send + 'static,
{
    async fn handle(&self, conn: Arc<Connection>, data: Value) -> AppResult<()> {
        (self.0)(conn, data).await
    }
}
