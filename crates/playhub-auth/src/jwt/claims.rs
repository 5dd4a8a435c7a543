//! Claims carried by a socket handshake token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use playhub_core::types::UserId;

/// JWT claims payload presented when opening a socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Symmetric key material for envelope encryption. Empty disables
    /// encryption for this connection.
    #[serde(default)]
    pub key: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token id.
    pub jti: Uuid,
}

impl HandshakeClaims {
    /// Returns the user id, or `None` when the subject is blank.
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(self.sub.clone())
    }

    /// Returns the session key, or `None` when encryption is off for this peer.
    pub fn session_key(&self) -> Option<&str> {
        if self.key.is_empty() {
            None
        } else {
            Some(&self.key)
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
