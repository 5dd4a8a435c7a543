//! Handshake token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use playhub_core::config::auth::AuthConfig;
use playhub_core::error::AppError;

use super::claims::HandshakeClaims;

/// Validates handshake tokens.
#[derive(Clone)]
pub struct HandshakeDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for HandshakeDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl HandshakeDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a handshake token.
    pub fn decode(&self, token: &str) -> Result<HandshakeClaims, AppError> {
        let token_data = decode::<HandshakeClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })?;

        let claims = token_data.claims;
        if claims.user_id().is_none() {
            return Err(AppError::authentication("Token has no subject"));
        }

        tracing::debug!(user_id = %claims.sub, expires_at = %claims.expires_at(), "Handshake token accepted");
        Ok(claims)
    }
}
