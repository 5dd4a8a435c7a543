//! Envelope and cipher codec for socket frames.
//!
//! Wire format: `version ++ base64(nonce ++ ciphertext)` when the connection
//! encrypts, plain JSON otherwise. Version `'0'` is the only defined scheme.

pub mod cipher;
pub mod envelope;
pub mod error;

pub use cipher::SessionKey;
pub use envelope::{Envelope, EnvelopeCodec, ErrorDetails};
pub use error::CodecError;
