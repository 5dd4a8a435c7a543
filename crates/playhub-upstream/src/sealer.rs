//! Request body sealing with the backend's RSA public key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use playhub_core::error::AppError;

/// PKCS#1 v1.5 padding overhead per block.
const PADDING_OVERHEAD: usize = 11;

/// Encrypts request bodies to the backend's public key.
///
/// The payload is split into blocks that fit one PKCS#1 v1.5 encryption
/// each; the ciphertext blocks are concatenated and base64-encoded. Only the
/// holder of the private key can read the result.
#[derive(Clone)]
pub struct PayloadSealer {
    key: RsaPublicKey,
}

impl std::fmt::Debug for PayloadSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadSealer")
            .field("key_bits", &(self.key.size() * 8))
            .finish()
    }
}

impl PayloadSealer {
    /// Parses a PEM public key, either `PUBLIC KEY` (SPKI) or
    /// `RSA PUBLIC KEY` (PKCS#1).
    pub fn from_pem(pem: &str) -> Result<Self, AppError> {
        let pem = pem.trim();
        let key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| AppError::configuration(format!("Invalid upstream public key: {e}")))?;
        Ok(Self { key })
    }

    /// Largest plaintext block one encryption can take.
    pub fn block_size(&self) -> usize {
        self.key.size() - PADDING_OVERHEAD
    }

    /// Seals `payload` into the base64 text sent as `sign`.
    pub fn seal(&self, payload: &str) -> Result<String, AppError> {
        let mut sealed = Vec::with_capacity(self.key.size() * payload.len().div_ceil(self.block_size()).max(1));
        for block in payload.as_bytes().chunks(self.block_size()) {
            let encrypted = self
                .key
                .encrypt(&mut OsRng, Pkcs1v15Encrypt, block)
                .map_err(|e| AppError::internal(format!("Failed to seal upstream payload: {e}")))?;
            sealed.extend_from_slice(&encrypted);
        }
        Ok(BASE64.encode(sealed))
    }
}
