//! A single live socket connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use playhub_core::config::realtime::RealtimeConfig;
use playhub_core::types::{ConnectionId, UserId};

use crate::codec::{EnvelopeCodec, ErrorDetails, SessionKey};
use crate::hub::Hub;

use super::authenticator::PeerIdentity;

/// Result of enqueueing a frame for a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The frame is in the connection's outbound queue.
    Queued,
    /// No live connection for the target user; nothing was sent.
    Offline,
    /// The connection is already torn down.
    Closed,
    /// The queue stayed full past the push timeout and the connection was
    /// dropped as too slow.
    Disconnected,
    /// The payload could not be encoded.
    EncodeFailed,
}

impl PushOutcome {
    /// Whether the frame reached the outbound queue.
    pub fn is_queued(self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// A handle to one live socket.
///
/// Everything outside the writer pump talks to the peer by pushing frames
/// onto the bounded outbound queue through this handle.
pub struct Connection {
    id: ConnectionId,
    user_id: Option<UserId>,
    session_key: Option<SessionKey>,
    sender: mpsc::Sender<String>,
    push_timeout: Duration,
    codec: EnvelopeCodec,
    hub: Arc<Hub>,
    connected_at: DateTime<Utc>,
    released: AtomicBool,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("encrypted", &self.session_key.is_some())
            .field("connected_at", &self.connected_at)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Connection {
    /// Creates a connection and the receiving end of its outbound queue.
    ///
    /// The receiver belongs to the writer pump; nothing else may drain it.
    pub fn new(
        id: ConnectionId,
        identity: PeerIdentity,
        hub: Arc<Hub>,
        codec: EnvelopeCodec,
        config: &RealtimeConfig,
    ) -> (Arc<Self>, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(config.send_buffer_size.max(1));
        let session_key = identity
            .session_key
            .as_deref()
            .and_then(SessionKey::derive);

        let connection = Arc::new(Self {
            id,
            user_id: identity.user_id,
            session_key,
            sender,
            push_timeout: config.push_timeout(),
            codec,
            hub,
            connected_at: Utc::now(),
            released: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });

        (connection, receiver)
    }

    /// Connection id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Owning user, `None` for an unauthenticated peer.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Session key, `None` when this connection does not encrypt.
    pub fn session_key(&self) -> Option<&SessionKey> {
        self.session_key.as_ref()
    }

    /// Codec used for this connection's frames.
    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Hub this connection is registered with.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// When the socket was accepted.
    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Whether teardown has run.
    pub fn is_closed(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Resolves once teardown has run (after the hub entry is gone).
    pub async fn closed(&self) {
        self.shutdown.cancelled().await
    }

    pub(crate) fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Tears the connection down: unregisters it from the hub and stops both
    /// pumps; the writer pump then sends a close frame and drops the socket.
    ///
    /// Runs at most once. Returns `true` for the call that performed it.
    pub fn close(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.hub.unregister(self);
        self.shutdown.cancel();
        debug!(conn_id = %self.id, "Connection released");
        true
    }

    /// Enqueues an already-encoded frame.
    ///
    /// Waits up to the push timeout for queue space; a connection whose queue
    /// stays full is disconnected rather than stalling the caller.
    pub async fn push(&self, frame: String) -> PushOutcome {
        if self.is_closed() {
            return PushOutcome::Closed;
        }

        match self.sender.send_timeout(frame, self.push_timeout).await {
            Ok(()) => PushOutcome::Queued,
            Err(SendTimeoutError::Timeout(_)) => {
                warn!(
                    conn_id = %self.id,
                    user_id = ?self.user_id,
                    timeout_ms = self.push_timeout.as_millis() as u64,
                    "Outbound queue full, disconnecting slow peer"
                );
                self.close();
                PushOutcome::Disconnected
            }
            Err(SendTimeoutError::Closed(_)) => PushOutcome::Closed,
        }
    }

    /// Sends a `{command, data}` envelope to this peer.
    pub async fn success<T>(&self, command: &str, data: &T) -> PushOutcome
    where
        T: Serialize + ?Sized,
    {
        match self
            .codec
            .encode_success(command, data, self.session_key.as_ref())
        {
            Ok(frame) => {
                debug!(conn_id = %self.id, command, "Push");
                self.push(frame).await
            }
            Err(e) => {
                error!(conn_id = %self.id, command, error = %e, "Failed to encode envelope");
                PushOutcome::EncodeFailed
            }
        }
    }

    /// Sends a `{command, error}` envelope to this peer.
    pub async fn error(&self, command: &str, error: &ErrorDetails) -> PushOutcome {
        match self
            .codec
            .encode_error(command, error, self.session_key.as_ref())
        {
            Ok(frame) => self.push(frame).await,
            Err(e) => {
                error!(conn_id = %self.id, command, error = %e, "Failed to encode error envelope");
                PushOutcome::EncodeFailed
            }
        }
    }

    /// Sends a system error in the legacy `{"command":"error","error":{..}}`
    /// shape, where the error body is free-form.
    pub async fn internal_error(&self, details: &Value) -> PushOutcome {
        let message = json!({ "command": "error", "error": details });
        match self.codec.encode(&message, self.session_key.as_ref()) {
            Ok(frame) => self.push(frame).await,
            Err(e) => {
                error!(conn_id = %self.id, error = %e, "Failed to encode system error");
                PushOutcome::EncodeFailed
            }
        }
    }

    /// Sends a success envelope to whichever connection `user_id` owns.
    pub async fn push_uid<T>(&self, user_id: &UserId, command: &str, data: &T) -> PushOutcome
    where
        T: Serialize + Sync + ?Sized,
    {
        self.hub.push_uid(user_id, command, data).await
    }

    /// Sends a success envelope to each user independently.
    pub async fn push_users<T>(&self, user_ids: &[UserId], command: &str, data: &T) -> usize
    where
        T: Serialize + Sync + ?Sized,
    {
        self.hub.push_users(user_ids, command, data).await
    }
}
