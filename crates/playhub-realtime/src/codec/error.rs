//! Codec failure modes.

use thiserror::Error;

use playhub_core::error::{AppError, ErrorKind};

/// Why a frame could not be encoded or decoded.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame was empty after normalisation.
    #[error("empty frame")]
    Empty,
    /// The leading format-version character is not a known scheme.
    #[error("unknown format version {0:?}")]
    UnknownVersion(char),
    /// The encrypted body is not valid base64.
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The sealed body is shorter than a nonce.
    #[error("sealed body truncated ({0} bytes)")]
    Truncated(usize),
    /// Encryption or authentication failed.
    #[error("cipher failure")]
    Cipher,
    /// The JSON envelope is malformed.
    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        AppError::with_source(ErrorKind::Serialization, err.to_string(), err)
    }
}
