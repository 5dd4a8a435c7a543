//! In-process transport: a channel pair standing in for a socket.
//!
//! The server half plugs into [`RealtimeEngine::accept`](crate::RealtimeEngine::accept);
//! the [`MemoryPeer`] half plays the client.

use futures::channel::mpsc;
use futures::sink::SinkMapErr;
use futures::{SinkExt, StreamExt};

use super::frame::{CloseReason, Frame, TransportError};

/// Receive half handed to the reader pump.
pub type MemoryStream = mpsc::Receiver<Result<Frame, TransportError>>;

/// Send half handed to the writer pump.
pub type MemorySink = SinkMapErr<mpsc::Sender<Frame>, fn(mpsc::SendError) -> TransportError>;

fn peer_gone(_: mpsc::SendError) -> TransportError {
    TransportError::Closed
}

/// Creates a transport whose client side buffers up to 64 frames.
pub fn pair() -> (MemoryStream, MemorySink, MemoryPeer) {
    pair_with_capacity(64)
}

/// Creates a transport whose client side buffers up to `capacity` frames
/// before server writes start to block.
pub fn pair_with_capacity(capacity: usize) -> (MemoryStream, MemorySink, MemoryPeer) {
    let (to_server, stream) = mpsc::channel(capacity);
    let (sink, from_server) = mpsc::channel(capacity);
    let sink = sink.sink_map_err(peer_gone as fn(mpsc::SendError) -> TransportError);

    (
        stream,
        sink,
        MemoryPeer {
            to_server,
            from_server,
        },
    )
}

/// Client end of a memory transport.
#[derive(Debug)]
pub struct MemoryPeer {
    to_server: mpsc::Sender<Result<Frame, TransportError>>,
    from_server: mpsc::Receiver<Frame>,
}

impl MemoryPeer {
    /// Sends a frame to the server. Returns `false` once the server stopped
    /// reading.
    pub async fn send(&mut self, frame: Frame) -> bool {
        self.to_server.send(Ok(frame)).await.is_ok()
    }

    /// Sends a text frame.
    pub async fn send_text(&mut self, text: impl Into<String>) -> bool {
        self.send(Frame::Text(text.into())).await
    }

    /// Answers a ping.
    pub async fn pong(&mut self) -> bool {
        self.send(Frame::Pong(Vec::new())).await
    }

    /// Sends a close frame.
    pub async fn close(&mut self, code: u16, reason: &str) -> bool {
        let reason = CloseReason {
            code,
            reason: reason.to_string(),
        };
        self.send(Frame::Close(Some(reason))).await
    }

    /// Makes the server's next read fail with `error`.
    pub async fn fail(&mut self, error: TransportError) -> bool {
        self.to_server.send(Err(error)).await.is_ok()
    }

    /// Next frame written by the server; `None` once the server closed its
    /// send half.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.from_server.next().await
    }

    /// Next text frame, skipping pings. `None` on close.
    pub async fn recv_text(&mut self) -> Option<String> {
        loop {
            match self.recv().await? {
                Frame::Text(text) => return Some(text),
                Frame::Close(_) => return None,
                _ => continue,
            }
        }
    }

    /// Drops the client's send half, ending the server's read stream.
    pub fn hang_up(&mut self) {
        self.to_server.close_channel();
    }
}
