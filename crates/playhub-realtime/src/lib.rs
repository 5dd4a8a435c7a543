//! # playhub-realtime
//!
//! Real-time connection layer for Playhub. Provides:
//!
//! - One [`Connection`] per socket with a reader pump and a writer pump; the
//!   writer pump is the only task that ever touches the socket's send half
//! - A process-wide [`Hub`] indexing live connections by id and by user
//! - The envelope codec with optional per-session AES-256-GCM wrapping
//! - A constructed-once [`CommandRegistry`] dispatching inbound commands
//! - The session store arbitrating reconnect races

pub mod codec;
pub mod command;
pub mod connection;
pub mod hub;
pub mod server;
pub mod session;

pub use codec::EnvelopeCodec;
pub use command::{CommandHandler, CommandRegistry};
pub use connection::{Connection, PeerIdentity, PumpHandles, PushOutcome};
pub use hub::Hub;
pub use server::RealtimeEngine;
pub use session::{CacheSessionStore, MemorySessionStore, SessionStore};
