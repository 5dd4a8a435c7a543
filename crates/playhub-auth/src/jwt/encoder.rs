//! Handshake token creation.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use playhub_core::config::auth::AuthConfig;
use playhub_core::error::AppError;
use playhub_core::types::UserId;

use super::claims::HandshakeClaims;

/// Creates signed handshake tokens.
#[derive(Clone)]
pub struct HandshakeEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Default token TTL in seconds.
    ttl_seconds: i64,
}

impl std::fmt::Debug for HandshakeEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeEncoder")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl HandshakeEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_seconds: config.token_ttl_seconds as i64,
        }
    }

    /// Issues a token for `user_id` with the configured TTL.
    pub fn issue(&self, user_id: &UserId, session_key: Option<&str>) -> Result<String, AppError> {
        self.issue_with_ttl(user_id, session_key, self.ttl_seconds)
    }

    /// Issues a token for `user_id` that expires `ttl_seconds` from now.
    pub fn issue_with_ttl(
        &self,
        user_id: &UserId,
        session_key: Option<&str>,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = HandshakeClaims {
            sub: user_id.to_string(),
            key: session_key.unwrap_or_default().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + ttl_seconds,
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign handshake token: {e}")))
    }
}
