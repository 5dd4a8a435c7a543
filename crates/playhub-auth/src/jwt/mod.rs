//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::HandshakeClaims;
pub use decoder::HandshakeDecoder;
pub use encoder::HandshakeEncoder;
