//! Process-wide registry of live connections.

mod registry;

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use playhub_core::types::{ConnectionId, UserId};

use crate::connection::{Connection, PushOutcome};

use self::registry::Registry;

/// Live connections indexed by connection id and by user id.
///
/// Every lookup and mutation goes through one lock, so register, unregister
/// and push resolution share a single order. The lock is never held across
/// an await: pushes resolve the target under the lock and enqueue after
/// releasing it.
#[derive(Debug, Default)]
pub struct Hub {
    registry: Mutex<Registry>,
}

impl Hub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection. For an authenticated connection the user entry now
    /// names it, whatever it named before.
    ///
    /// A connection that has already been torn down is not added.
    pub fn register(&self, conn: Arc<Connection>) -> bool {
        let id = conn.id();
        let user_id = conn.user_id().cloned();

        let superseded = {
            let mut registry = self.registry.lock();
            if conn.is_closed() {
                return false;
            }
            registry.insert(conn)
        };

        match superseded {
            Some(previous) => info!(
                conn_id = %id,
                user_id = ?user_id,
                superseded = %previous,
                "Connection registered, superseding previous connection"
            ),
            None => info!(conn_id = %id, user_id = ?user_id, "Connection registered"),
        }
        true
    }

    /// Removes a connection, leaving the user entry alone when a newer
    /// connection already owns it.
    pub fn unregister(&self, conn: &Connection) {
        let removed = self
            .registry
            .lock()
            .remove(conn.id(), conn.user_id());
        if removed {
            info!(conn_id = %conn.id(), user_id = ?conn.user_id(), "Connection unregistered");
        }
    }

    /// Looks up a live connection by id.
    pub fn get(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        self.registry.lock().get(id).cloned()
    }

    /// The connection id currently recorded for `user_id`.
    pub fn owner_of(&self, user_id: &UserId) -> Option<ConnectionId> {
        self.registry.lock().owner(user_id)
    }

    /// The connection currently owned by `user_id`.
    pub fn connection_for_user(&self, user_id: &UserId) -> Option<Arc<Connection>> {
        self.registry.lock().for_user(user_id).cloned()
    }

    /// Whether `user_id` has a live connection.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.registry.lock().for_user(user_id).is_some()
    }

    /// Number of live connections, anonymous ones included.
    pub fn connection_count(&self) -> usize {
        self.registry.lock().connection_count()
    }

    /// Number of users with a live connection.
    pub fn user_count(&self) -> usize {
        self.registry.lock().user_count()
    }

    /// Sends a success envelope to `user_id`'s connection.
    ///
    /// An offline user is the normal case, not an error: the push is dropped
    /// and [`PushOutcome::Offline`] returned.
    pub async fn push_uid<T>(&self, user_id: &UserId, command: &str, data: &T) -> PushOutcome
    where
        T: Serialize + Sync + ?Sized,
    {
        let Some(conn) = self.connection_for_user(user_id) else {
            debug!(user_id = %user_id, command, "Push dropped, user offline");
            return PushOutcome::Offline;
        };
        conn.success(command, data).await
    }

    /// Sends a success envelope to each user independently. Delivery order
    /// across users is unspecified. Returns how many pushes were queued.
    pub async fn push_users<T>(&self, user_ids: &[UserId], command: &str, data: &T) -> usize
    where
        T: Serialize + Sync + ?Sized,
    {
        let outcomes = join_all(
            user_ids
                .iter()
                .map(|user_id| self.push_uid(user_id, command, data)),
        )
        .await;
        outcomes.into_iter().filter(|o| o.is_queued()).count()
    }

    /// Tears down every live connection. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let connections = self.registry.lock().connections();
        let closed = connections.iter().filter(|conn| conn.close()).count();
        info!(closed, "Closed all connections");
        closed
    }
}
