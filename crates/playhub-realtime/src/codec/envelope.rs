//! `{command, data}` / `{command, error}` envelopes and their frame encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use playhub_core::error::AppError;

use super::cipher::{self, SessionKey};
use super::error::CodecError;

/// Format-version character prefixed to encrypted frames.
pub const FORMAT_V0: char = '0';

/// Error payload of an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
}

impl ErrorDetails {
    /// Creates error details.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&AppError> for ErrorDetails {
    fn from(err: &AppError) -> Self {
        Self::new(err.kind.code(), err.message.clone())
    }
}

/// Decoded envelope.
///
/// Inbound frames carry `command` and `data`; outbound frames carry either
/// `data` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Command name.
    pub command: String,
    /// Command payload.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// Error details, present on error envelopes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

#[derive(Serialize)]
struct SuccessFrame<'a, T: ?Sized> {
    command: &'a str,
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorFrame<'a> {
    command: &'a str,
    error: &'a ErrorDetails,
}

/// Encodes and decodes envelopes, applying the cipher when encryption is
/// enabled process-wide and the connection carries a session key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCodec {
    encryption_enabled: bool,
}

impl EnvelopeCodec {
    /// Creates a codec.
    pub fn new(encryption_enabled: bool) -> Self {
        Self { encryption_enabled }
    }

    /// Whether encryption is enabled process-wide.
    pub fn encryption_enabled(&self) -> bool {
        self.encryption_enabled
    }

    fn active_key<'k>(&self, key: Option<&'k SessionKey>) -> Option<&'k SessionKey> {
        key.filter(|_| self.encryption_enabled)
    }

    /// Encodes a success envelope.
    pub fn encode_success<T>(
        &self,
        command: &str,
        data: &T,
        key: Option<&SessionKey>,
    ) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        self.encode(&SuccessFrame { command, data }, key)
    }

    /// Encodes an error envelope.
    pub fn encode_error(
        &self,
        command: &str,
        error: &ErrorDetails,
        key: Option<&SessionKey>,
    ) -> Result<String, CodecError> {
        self.encode(&ErrorFrame { command, error }, key)
    }

    /// Encodes any serializable message into a transport frame.
    pub fn encode<T>(&self, message: &T, key: Option<&SessionKey>) -> Result<String, CodecError>
    where
        T: Serialize + ?Sized,
    {
        match self.active_key(key) {
            Some(key) => {
                let json = serde_json::to_vec(message)?;
                let sealed = cipher::seal(key, &json)?;
                let mut frame = String::with_capacity(1 + sealed.len() * 4 / 3 + 4);
                frame.push(FORMAT_V0);
                BASE64.encode_string(sealed, &mut frame);
                Ok(frame)
            }
            None => Ok(serde_json::to_string(message)?),
        }
    }

    /// Decodes a normalised transport frame into an envelope.
    pub fn decode(&self, frame: &str, key: Option<&SessionKey>) -> Result<Envelope, CodecError> {
        let Some(version) = frame.chars().next() else {
            return Err(CodecError::Empty);
        };

        match self.active_key(key) {
            Some(key) => {
                if version != FORMAT_V0 {
                    return Err(CodecError::UnknownVersion(version));
                }
                let sealed = BASE64.decode(&frame[version.len_utf8()..])?;
                let json = cipher::open(key, &sealed)?;
                Ok(serde_json::from_slice(&json)?)
            }
            None => Ok(serde_json::from_str(frame)?),
        }
    }
}
