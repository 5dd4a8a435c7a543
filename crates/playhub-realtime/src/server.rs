//! Top-level real-time engine that ties the hub, sessions and commands together.

use std::sync::Arc;

use futures::{Sink, Stream};
use serde::Serialize;
use tracing::info;

use playhub_core::config::realtime::RealtimeConfig;
use playhub_core::result::AppResult;
use playhub_core::types::{ConnectionId, UserId};

use crate::codec::EnvelopeCodec;
use crate::command::CommandRegistry;
use crate::connection::lifecycle::{self, PumpSettings};
use crate::connection::{Connection, Frame, PeerIdentity, PumpHandles, PushOutcome, TransportError};
use crate::hub::Hub;
use crate::session::SessionStore;

/// Central real-time engine. Cheap to clone; every clone shares one hub.
#[derive(Clone)]
pub struct RealtimeEngine {
    hub: Arc<Hub>,
    sessions: Arc<dyn SessionStore>,
    commands: CommandRegistry,
    codec: EnvelopeCodec,
    config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.hub.connection_count())
            .field("commands", &self.commands)
            .field("encryption_enabled", &self.codec.encryption_enabled())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates an engine with an empty hub.
    pub fn new(
        config: RealtimeConfig,
        sessions: Arc<dyn SessionStore>,
        commands: CommandRegistry,
    ) -> Self {
        info!(
            commands = commands.len(),
            encryption_enabled = config.encryption_enabled,
            "Real-time engine initialized"
        );
        Self {
            hub: Arc::new(Hub::new()),
            sessions,
            codec: EnvelopeCodec::new(config.encryption_enabled),
            commands,
            config,
        }
    }

    /// The connection hub.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// The session store.
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// The command table.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Takes ownership of an upgraded socket.
    ///
    /// An authenticated peer first claims its user's session record, then the
    /// connection is registered and both pumps are spawned. A failed claim
    /// rejects the socket before anything is registered.
    pub async fn accept<R, W>(
        &self,
        identity: PeerIdentity,
        stream: R,
        sink: W,
    ) -> AppResult<(Arc<Connection>, PumpHandles)>
    where
        R: Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static,
        W: Sink<Frame, Error = TransportError> + Unpin + Send + 'static,
    {
        let id = ConnectionId::new();
        if let Some(user_id) = &identity.user_id {
            self.sessions.claim(user_id, id).await?;
        }

        let (conn, queue) = Connection::new(id, identity, self.hub.clone(), self.codec, &self.config);
        self.hub.register(conn.clone());

        let handles = lifecycle::spawn_pumps(
            conn.clone(),
            queue,
            stream,
            sink,
            self.commands.clone(),
            self.sessions.clone(),
            PumpSettings::from(&self.config),
        );

        Ok((conn, handles))
    }

    /// See [`Hub::push_uid`].
    pub async fn push_uid<T>(&self, user_id: &UserId, command: &str, data: &T) -> PushOutcome
    where
        T: Serialize + Sync + ?Sized,
    {
        self.hub.push_uid(user_id, command, data).await
    }

    /// See [`Hub::push_users`].
    pub async fn push_users<T>(&self, user_ids: &[UserId], command: &str, data: &T) -> usize
    where
        T: Serialize + Sync + ?Sized,
    {
        self.hub.push_users(user_ids, command, data).await
    }

    /// Tears down every connection; each writer sends a close frame.
    pub fn shutdown(&self) -> usize {
        info!("Shutting down real-time engine");
        let closed = self.hub.close_all();
        info!(closed, "Real-time engine shut down");
        closed
    }
}
