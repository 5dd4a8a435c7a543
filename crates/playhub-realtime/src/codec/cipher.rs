//! AES-256-GCM wrapping under a per-session key.
//!
//! Sealed layout: nonce (12 bytes) || ciphertext (includes 16-byte GCM tag).

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::{Digest, Sha256};

use super::error::CodecError;

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_LEN: usize = 12;

/// 256-bit key derived from the session key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    /// Derives a key from the textual key material agreed at handshake.
    /// Empty material means encryption is disabled and yields `None`.
    pub fn derive(material: &str) -> Option<Self> {
        if material.is_empty() {
            return None;
        }
        Some(Self(Sha256::digest(material.as_bytes()).into()))
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(&Key::<Aes256Gcm>::from(self.0))
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Encrypts `plaintext` with a fresh random nonce.
pub fn seal(key: &SessionKey, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = key
        .cipher()
        .encrypt(&nonce, plaintext)
        .map_err(|_| CodecError::Cipher)?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypts a `nonce || ciphertext` body.
pub fn open(key: &SessionKey, sealed: &[u8]) -> Result<Vec<u8>, CodecError> {
    if sealed.len() < NONCE_LEN {
        return Err(CodecError::Truncated(sealed.len()));
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    key.cipher()
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CodecError::Cipher)
}
