//! Process-local session store for tests and single-node development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use playhub_core::result::AppResult;
use playhub_core::types::{ConnectionId, UserId};

use super::store::SessionStore;

/// Session store backed by a map. Does not survive restarts.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<UserId, ConnectionId>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Whether no session is recorded.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn claim(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<()> {
        self.sessions.lock().insert(user_id.clone(), conn_id);
        Ok(())
    }

    async fn owning_connection(&self, user_id: &UserId) -> AppResult<Option<ConnectionId>> {
        Ok(self.sessions.lock().get(user_id).copied())
    }

    async fn delete(&self, user_id: &UserId) -> AppResult<()> {
        self.sessions.lock().remove(user_id);
        Ok(())
    }

    async fn release(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<bool> {
        let mut sessions = self.sessions.lock();
        if sessions.get(user_id) == Some(&conn_id) {
            sessions.remove(user_id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
