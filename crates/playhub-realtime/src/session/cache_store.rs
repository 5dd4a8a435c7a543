//! Session store over the shared record backend (Redis in production).

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use playhub_cache::RecordCache;
use playhub_cache::keys;
use playhub_core::error::AppError;
use playhub_core::result::AppResult;
use playhub_core::traits::SessionRecords;
use playhub_core::types::{ConnectionId, UserId};

use super::store::SessionStore;

/// Stores `session:socket:{user}` → connection id as an expiring record.
#[derive(Debug, Clone)]
pub struct CacheSessionStore {
    records: RecordCache,
    ttl: Duration,
}

impl CacheSessionStore {
    /// Creates a store writing records with `ttl`.
    pub fn new(records: RecordCache, ttl: Duration) -> Self {
        Self { records, ttl }
    }
}

#[async_trait]
impl SessionStore for CacheSessionStore {
    async fn claim(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<()> {
        let key = keys::session_socket(user_id);
        self.records
            .put(&key, &conn_id.to_string(), self.ttl)
            .await
            .map_err(|e| AppError::session(format!("Failed to claim session for {user_id}: {e}")))?;
        debug!(user_id = %user_id, conn_id = %conn_id, "Session claimed");
        Ok(())
    }

    async fn owning_connection(&self, user_id: &UserId) -> AppResult<Option<ConnectionId>> {
        let key = keys::session_socket(user_id);
        let raw = self
            .records
            .holder(&key)
            .await
            .map_err(|e| AppError::session(format!("Failed to read session for {user_id}: {e}")))?;

        Ok(raw.and_then(|value| match value.parse::<ConnectionId>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(user_id = %user_id, value = %value, error = %e, "Unparseable session record");
                None
            }
        }))
    }

    async fn delete(&self, user_id: &UserId) -> AppResult<()> {
        let key = keys::session_socket(user_id);
        self.records
            .remove(&key)
            .await
            .map_err(|e| AppError::session(format!("Failed to delete session for {user_id}: {e}")))?;
        debug!(user_id = %user_id, "Session deleted");
        Ok(())
    }

    async fn release(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<bool> {
        let key = keys::session_socket(user_id);
        let released = self
            .records
            .remove_if_held_by(&key, &conn_id.to_string())
            .await
            .map_err(|e| AppError::session(format!("Failed to release session for {user_id}: {e}")))?;
        debug!(user_id = %user_id, conn_id = %conn_id, released, "Session release");
        Ok(released)
    }
}
