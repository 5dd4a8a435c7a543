//! Engine harness driving connections over the in-process transport.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use playhub_core::config::realtime::RealtimeConfig;
use playhub_core::error::AppError;
use playhub_core::result::AppResult;
use playhub_core::types::{ConnectionId, UserId};
use playhub_realtime::command::OFFLINE_COMMAND;
use playhub_realtime::connection::memory;
use playhub_realtime::{
    CommandRegistry, Connection, MemorySessionStore, PeerIdentity, PumpHandles, RealtimeEngine,
    SessionStore,
};

pub use playhub_realtime::connection::MemoryPeer;

/// Memory session store whose operations can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingSessionStore {
    inner: MemorySessionStore,
    claims: AtomicBool,
    lookups: AtomicBool,
    releases: AtomicBool,
}

impl FailingSessionStore {
    pub fn fail_claims(&self) {
        self.claims.store(true, Ordering::SeqCst);
    }

    pub fn fail_lookups(&self) {
        self.lookups.store(true, Ordering::SeqCst);
    }

    /// Fails both `delete` and `release`.
    pub fn fail_releases(&self) {
        self.releases.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        for flag in [&self.claims, &self.lookups, &self.releases] {
            flag.store(false, Ordering::SeqCst);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(flag: &AtomicBool, op: &str) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(AppError::session(format!("{op}: store unavailable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn claim(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<()> {
        Self::check(&self.claims, "claim")?;
        self.inner.claim(user_id, conn_id).await
    }

    async fn owning_connection(&self, user_id: &UserId) -> AppResult<Option<ConnectionId>> {
        Self::check(&self.lookups, "lookup")?;
        self.inner.owning_connection(user_id).await
    }

    async fn delete(&self, user_id: &UserId) -> AppResult<()> {
        Self::check(&self.releases, "delete")?;
        self.inner.delete(user_id).await
    }

    async fn release(&self, user_id: &UserId, conn_id: ConnectionId) -> AppResult<bool> {
        Self::check(&self.releases, "release")?;
        self.inner.release(user_id, conn_id).await
    }
}

/// Engine wired to a switchable session store and a small command table.
pub struct Harness {
    pub engine: RealtimeEngine,
    pub sessions: Arc<FailingSessionStore>,
    pub offline: Arc<Mutex<Vec<String>>>,
}

/// A connected client.
pub struct Client {
    pub conn: Arc<Connection>,
    pub pumps: PumpHandles,
    pub peer: MemoryPeer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(RealtimeConfig::default())
    }

    pub fn with_config(config: RealtimeConfig) -> Self {
        let sessions = Arc::new(FailingSessionStore::default());
        let offline = Arc::new(Mutex::new(Vec::new()));
        let recorded = offline.clone();

        let commands = CommandRegistry::builder()
            .register_fn("echo", |conn: Arc<Connection>, data: Value| async move {
                conn.success("echo", &data).await;
                Ok(())
            })
            .register_fn("reject", |_conn, _data| async {
                Err(AppError::validation("seat is taken"))
            })
            .register_fn("boom", |_conn, data: Value| async move {
                if data.is_null() {
                    panic!("handler exploded");
                }
                Ok(())
            })
            .register_fn("greet_user", |conn: Arc<Connection>, data: Value| async move {
                let to = data["to"].as_str().unwrap_or_default();
                let to = UserId::parse(to).ok_or_else(|| AppError::validation("missing target"))?;
                conn.push_uid(&to, "greet", &json!({ "msg": data["msg"] }))
                    .await;
                Ok(())
            })
            .register_fn(OFFLINE_COMMAND, move |conn: Arc<Connection>, _data| {
                let recorded = recorded.clone();
                async move {
                    if let Some(user) = conn.user_id() {
                        recorded.lock().push(user.to_string());
                    }
                    Ok(())
                }
            })
            .build();

        let engine = RealtimeEngine::new(config, sessions.clone(), commands);
        Self {
            engine,
            sessions,
            offline,
        }
    }

    pub async fn connect(&self, user: &str) -> Client {
        self.connect_as(PeerIdentity::user(user, None)).await
    }

    pub async fn connect_as(&self, identity: PeerIdentity) -> Client {
        let (stream, sink, peer) = memory::pair();
        let (conn, pumps) = self
            .engine
            .accept(identity, stream, sink)
            .await
            .expect("accept");
        Client { conn, pumps, peer }
    }

    pub fn offline_users(&self) -> Vec<String> {
        self.offline.lock().clone()
    }
}

/// Parses a plaintext frame.
pub fn parse(frame: &str) -> Value {
    serde_json::from_str(frame).expect("frame is JSON")
}
