//! Backend seam for session ownership records.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Expiring string records with an owner-checked removal.
///
/// Each record maps a key to the id of whoever holds it. Writers overwrite
/// unconditionally; `remove_if_held_by` only clears a record that still names
/// the caller, atomically with respect to concurrent writes.
#[async_trait]
pub trait SessionRecords: Send + Sync + std::fmt::Debug + 'static {
    /// Stores `holder` under `key` for `ttl`, replacing any previous holder.
    async fn put(&self, key: &str, holder: &str, ttl: Duration) -> AppResult<()>;

    /// Current holder of `key`, if the record exists and has not expired.
    async fn holder(&self, key: &str) -> AppResult<Option<String>>;

    /// Drops `key` regardless of holder.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Drops `key` only while it still names `holder`. Returns whether it did.
    async fn remove_if_held_by(&self, key: &str, holder: &str) -> AppResult<bool>;

    /// Fails if the backend cannot be reached.
    async fn ping(&self) -> AppResult<()>;
}
