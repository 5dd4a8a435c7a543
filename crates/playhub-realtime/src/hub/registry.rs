//! The hub's two indexes and the rules that keep them consistent.

use std::collections::HashMap;
use std::sync::Arc;

use playhub_core::types::{ConnectionId, UserId};

use crate::connection::Connection;

/// Live connections by id, and the authoritative connection id per user.
///
/// `by_user` only ever names ids present in `by_id`: an entry is replaced by a
/// newer registration for the same user or removed together with its owner.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    by_id: HashMap<ConnectionId, Arc<Connection>>,
    by_user: HashMap<UserId, ConnectionId>,
}

impl Registry {
    /// Adds a connection. The last registration for a user wins; returns the
    /// id it superseded, if any.
    pub(crate) fn insert(&mut self, conn: Arc<Connection>) -> Option<ConnectionId> {
        let id = conn.id();
        let superseded = conn
            .user_id()
            .cloned()
            .and_then(|user| self.by_user.insert(user, id))
            .filter(|previous| *previous != id);
        self.by_id.insert(id, conn);
        superseded
    }

    /// Removes a connection. The user entry goes too, but only while it still
    /// names this connection.
    pub(crate) fn remove(&mut self, id: ConnectionId, user: Option<&UserId>) -> bool {
        let removed = self.by_id.remove(&id).is_some();
        if let Some(user) = user {
            if self.by_user.get(user) == Some(&id) {
                self.by_user.remove(user);
            }
        }
        removed
    }

    pub(crate) fn get(&self, id: ConnectionId) -> Option<&Arc<Connection>> {
        self.by_id.get(&id)
    }

    pub(crate) fn owner(&self, user: &UserId) -> Option<ConnectionId> {
        self.by_user.get(user).copied()
    }

    pub(crate) fn for_user(&self, user: &UserId) -> Option<&Arc<Connection>> {
        self.owner(user).and_then(|id| self.by_id.get(&id))
    }

    pub(crate) fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn user_count(&self) -> usize {
        self.by_user.len()
    }

    pub(crate) fn connections(&self) -> Vec<Arc<Connection>> {
        self.by_id.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.by_user.values().all(|id| self.by_id.contains_key(id))
    }
}
