//! Transport boundary: the frames a duplex socket carries.
//!
//! The pumps consume a `Stream<Item = Result<Frame, TransportError>>` for the
//! receive half and a `Sink<Frame, Error = TransportError>` for the send half,
//! so any message-framed, ping/pong-capable socket can be adapted.

use thiserror::Error;

/// Close status code and reason text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    /// Close status code.
    pub code: u16,
    /// Close reason text.
    pub reason: String,
}

impl CloseReason {
    /// Normal closure (1000).
    pub fn normal() -> Self {
        Self {
            code: 1000,
            reason: String::new(),
        }
    }
}

/// One transport frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 data frame.
    Text(String),
    /// Binary data frame.
    Binary(Vec<u8>),
    /// Ping control frame.
    Ping(Vec<u8>),
    /// Pong control frame.
    Pong(Vec<u8>),
    /// Close control frame.
    Close(Option<CloseReason>),
}

impl Frame {
    /// Payload length used for the inbound size limit.
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) | Self::Ping(bytes) | Self::Pong(bytes) => bytes.len(),
            Self::Close(reason) => reason.as_ref().map_or(0, |r| r.reason.len() + 2),
        }
    }
}

/// Transport-level failure. Always fatal to the one connection it hits.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer or the socket closed.
    #[error("transport closed")]
    Closed,
    /// No frame arrived before the read deadline.
    #[error("read deadline exceeded")]
    ReadTimeout,
    /// A frame could not be written before the write deadline.
    #[error("write deadline exceeded")]
    WriteTimeout,
    /// An inbound frame exceeded the size limit.
    #[error("frame of {size} bytes exceeds limit of {limit}")]
    FrameTooLarge {
        /// Observed payload size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Any other socket failure.
    #[error("transport error: {0}")]
    Io(String),
}
