//! Socket handshake authentication: validates the token presented on upgrade.

use std::sync::Arc;

use playhub_auth::jwt::HandshakeDecoder;
use playhub_core::error::AppError;
use playhub_core::types::UserId;

/// Who is on the other end of a socket, as established at handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerIdentity {
    /// Owning user. `None` means the peer is not authenticated.
    pub user_id: Option<UserId>,
    /// Key material for envelope encryption. `None` disables encryption.
    pub session_key: Option<String>,
}

impl PeerIdentity {
    /// An unauthenticated peer.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A peer owned by `user_id`. A blank id yields an anonymous identity.
    pub fn user(user_id: &str, session_key: Option<&str>) -> Self {
        Self {
            user_id: UserId::parse(user_id),
            session_key: session_key.filter(|k| !k.is_empty()).map(str::to_owned),
        }
    }

    /// Whether the peer is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Authenticates socket upgrades using handshake tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    decoder: Arc<HandshakeDecoder>,
    require_token: bool,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator")
            .field("require_token", &self.require_token)
            .finish()
    }
}

impl WsAuthenticator {
    /// Creates a new authenticator.
    pub fn new(decoder: Arc<HandshakeDecoder>, require_token: bool) -> Self {
        Self {
            decoder,
            require_token,
        }
    }

    /// Resolves the identity for an upgrade request carrying `token`.
    ///
    /// A missing token is an anonymous peer unless tokens are required. A
    /// token that is present but invalid is always rejected.
    pub fn authenticate(&self, token: Option<&str>) -> Result<PeerIdentity, AppError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let Some(token) = token else {
            if self.require_token {
                return Err(AppError::authentication("Missing handshake token"));
            }
            return Ok(PeerIdentity::anonymous());
        };

        let claims = self.decoder.decode(token)?;
        Ok(PeerIdentity {
            user_id: claims.user_id(),
            session_key: claims.session_key().map(str::to_owned),
        })
    }
}
