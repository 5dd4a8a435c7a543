//! Reader pump: inbound frames to dispatched commands, plus liveness.

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::codec::ErrorDetails;
use crate::command::{CommandRegistry, OFFLINE_COMMAND};
use crate::session::SessionStore;

use super::frame::{CloseReason, Frame, TransportError};
use super::handle::Connection;

/// What the reader pump needs besides the socket.
pub(crate) struct Reader {
    pub(crate) conn: Arc<Connection>,
    pub(crate) commands: CommandRegistry,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) pong_wait: Duration,
    pub(crate) max_message_size: usize,
}

impl Reader {
    /// Reads until the peer closes, the transport fails, the read deadline
    /// passes, or the connection is torn down elsewhere.
    ///
    /// The deadline starts at `pong_wait` from now and only a pong moves it.
    pub(crate) async fn run<S>(self, mut stream: S) -> Result<(), TransportError>
    where
        S: Stream<Item = Result<Frame, TransportError>> + Unpin + Send,
    {
        let shutdown = self.conn.shutdown_token().clone();
        let mut deadline = Instant::now() + self.pong_wait;

        loop {
            let next = tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                next = time::timeout_at(deadline, stream.next()) => next,
            };

            let frame = match next {
                Err(_) => return Err(TransportError::ReadTimeout),
                Ok(None) => return Err(TransportError::Closed),
                Ok(Some(Err(e))) => return Err(e),
                Ok(Some(Ok(frame))) => frame,
            };

            let size = frame.payload_len();
            if size > self.max_message_size {
                return Err(TransportError::FrameTooLarge {
                    size,
                    limit: self.max_message_size,
                });
            }

            match frame {
                Frame::Text(text) => self.dispatch(&text).await,
                Frame::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => self.dispatch(&text).await,
                    Err(_) => warn!(conn_id = %self.conn.id(), "Dropped non-UTF-8 binary frame"),
                },
                Frame::Pong(_) => deadline = Instant::now() + self.pong_wait,
                Frame::Ping(_) => {}
                Frame::Close(reason) => {
                    self.on_peer_close(reason).await;
                    return Ok(());
                }
            }
        }
    }

    /// Decodes one frame and runs its handler. Bad frames are logged and
    /// dropped; a handler error goes back to the peer as an error envelope.
    async fn dispatch(&self, raw: &str) {
        let text = normalize(raw);
        if text.is_empty() {
            return;
        }

        let conn = &self.conn;
        let envelope = match conn.codec().decode(&text, conn.session_key()) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(conn_id = %conn.id(), error = %e, "Dropped undecodable frame");
                return;
            }
        };

        let command = envelope.command;
        if command == OFFLINE_COMMAND {
            warn!(conn_id = %conn.id(), "Dropped client-sent offline command");
            return;
        }
        let Some(handler) = self.commands.lookup(&command) else {
            warn!(conn_id = %conn.id(), command = %command, "Dropped unknown command");
            return;
        };

        debug!(conn_id = %conn.id(), command = %command, "Dispatch");
        if let Err(err) = handler.handle(conn.clone(), envelope.data).await {
            warn!(
                conn_id = %conn.id(),
                command = %command,
                error = %err,
                "Command handler failed"
            );
            conn.error(&command, &ErrorDetails::from(&err)).await;
        }
    }

    /// Peer-initiated close. Fires the offline hook and clears the session
    /// record, but only while this connection still owns the session.
    async fn on_peer_close(&self, reason: Option<CloseReason>) {
        let conn = &self.conn;
        let reason = reason.unwrap_or_else(CloseReason::normal);
        info!(
            conn_id = %conn.id(),
            user_id = ?conn.user_id(),
            code = reason.code,
            reason = %reason.reason,
            "Peer closed connection"
        );

        let Some(user_id) = conn.user_id() else {
            return;
        };

        let owner = match self.sessions.owning_connection(user_id).await {
            Ok(owner) => owner,
            Err(e) => {
                warn!(conn_id = %conn.id(), user_id = %user_id, error = %e, "Session lookup failed on close");
                return;
            }
        };

        if owner != Some(conn.id()) {
            debug!(
                conn_id = %conn.id(),
                user_id = %user_id,
                owner = ?owner,
                "Connection superseded, leaving session alone"
            );
            return;
        }

        if let Some(handler) = self.commands.lookup(OFFLINE_COMMAND) {
            if let Err(e) = handler.handle(conn.clone(), Value::Null).await {
                warn!(conn_id = %conn.id(), user_id = %user_id, error = %e, "Offline handler failed");
            }
        }

        match self.sessions.release(user_id, conn.id()).await {
            Ok(true) => {}
            Ok(false) => debug!(
                conn_id = %conn.id(),
                user_id = %user_id,
                "Session reclaimed during close, newer owner kept"
            ),
            Err(e) => {
                warn!(conn_id = %conn.id(), user_id = %user_id, error = %e, "Session release failed on close")
            }
        }
    }
}

/// Newlines become spaces; surrounding whitespace is trimmed.
fn normalize(raw: &str) -> String {
    raw.replace('\n', " ").trim().to_string()
}
