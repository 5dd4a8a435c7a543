//! Handshake authentication configuration.

use serde::{Deserialize, Serialize};

/// Handshake token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify handshake tokens.
    #[serde(default = "default_secret")]
    pub jwt_secret: String,
    /// Lifetime of a freshly issued handshake token in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Reject upgrades that carry no token. When `false`, such peers
    /// connect anonymously without a user id or session key.
    #[serde(default = "default_true")]
    pub require_token: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_secret(),
            token_ttl_seconds: default_token_ttl(),
            require_token: true,
        }
    }
}

fn default_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_token_ttl() -> u64 {
    86_400
}

fn default_true() -> bool {
    true
}
