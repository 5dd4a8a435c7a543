//! WebSocket connection: handle, pumps, lifecycle, transport boundary, auth.

pub mod authenticator;
pub mod frame;
pub mod handle;
pub mod lifecycle;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod reader;
pub mod writer;

pub use authenticator::{PeerIdentity, WsAuthenticator};
pub use frame::{CloseReason, Frame, TransportError};
pub use handle::{Connection, PushOutcome};
pub use lifecycle::PumpHandles;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryPeer;
