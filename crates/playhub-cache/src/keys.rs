//! Cache key builders for all Playhub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use playhub_core::types::UserId;

// ── Session keys ───────────────────────────────────────────

/// Key holding the connection id that currently owns a user's session.
pub fn session_socket(user_id: &UserId) -> String {
    format!("session:socket:{user_id}")
}
