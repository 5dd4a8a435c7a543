//! # playhub-auth
//!
//! Handshake authentication for Playhub. A client opens its socket with a
//! signed token naming the user and the symmetric key established for the
//! session; this crate issues and validates those tokens.

pub mod jwt;

pub use jwt::{HandshakeClaims, HandshakeDecoder, HandshakeEncoder};
