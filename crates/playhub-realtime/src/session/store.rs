//! Session store trait.

use async_trait::async_trait;

use playhub_core::result::AppResult;
use playhub_core::types::{ConnectionId, UserId};

/// Records which connection currently owns each user's session.
///
/// A connection claims its user's record at handshake, overwriting any
/// previous owner. On peer close a connection clears the record only if it
/// still owns it, so a superseded connection never marks its user offline.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Makes `conn_id` the owner of `user_id`'s session.
    async fn claim(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<()>;

    /// The connection id that currently owns `user_id`'s session.
    async fn owning_connection(&self, user_id: &UserId) -> AppResult<Option<ConnectionId>>;

    /// Clears `user_id`'s session record.
    async fn delete(&self, user_id: &UserId) -> AppResult<()>;

    /// Clears `user_id`'s record only while `conn_id` still owns it, in one
    /// step with respect to concurrent claims. Returns whether it cleared.
    async fn release(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<bool>;
}
