//! Key material handling: the fixed-size field key and its derivation.
//!
//! # Lifecycle
//!
//! The field key is provisioned once at process start (see
//! [`crate::config::CodecConfig`]) and held in memory for the process
//! lifetime. Every blob a deployment writes must remain decryptable under
//! that same key, so the key is never rotated within a session and never
//! persisted alongside ciphertext.
//!
//! # Security invariants
//!
//! - Key bytes are zeroed when a [`CodecKey`] is dropped.
//! - Key bytes never appear in `Debug` output, logs, or error messages.

pub mod derive;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::crypto::KEY_LEN;

/// Errors produced by the key layer.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key material has an unexpected length.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),

    /// The encoded key is not valid base64.
    #[error("key is not valid base64")]
    InvalidEncoding,

    /// HKDF expansion failed while deriving a key from a passphrase.
    #[error("key derivation failed")]
    Derivation,
}

/// Fixed-size buffer holding exactly [`KEY_LEN`] secret bytes.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
#[derive(Clone)]
pub struct CodecKey(Box<[u8; KEY_LEN]>);

impl CodecKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if `bytes` is not exactly
    /// [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Build a key from a standard-base64 string.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidEncoding`] if `encoded` is not valid
    /// base64, or [`KeyError::InvalidLength`] if the decoded material is not
    /// exactly [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let mut bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| KeyError::InvalidEncoding)?;
        let key = Self::from_bytes(&bytes);
        // Zero the intermediate copy regardless of outcome.
        bytes.iter_mut().for_each(|b| *b = 0);
        key
    }

    /// Borrow the raw key bytes. Crate-internal: only the cipher layer needs
    /// them, and only at construction.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for CodecKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for CodecKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("CodecKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_accepts_exact_length() {
        let key = CodecKey::from_bytes(&[0x11u8; KEY_LEN]).unwrap();
        assert_eq!(key.as_bytes(), &[0x11u8; KEY_LEN]);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert!(matches!(
            CodecKey::from_bytes(&[0u8; 16]),
            Err(KeyError::InvalidLength(16))
        ));
        assert!(matches!(
            CodecKey::from_bytes(&[0u8; 33]),
            Err(KeyError::InvalidLength(33))
        ));
    }

    #[test]
    fn from_base64_round_trip() {
        let raw = [0xA5u8; KEY_LEN];
        let encoded = STANDARD.encode(raw);
        let key = CodecKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &raw);
    }

    #[test]
    fn from_base64_rejects_garbage() {
        assert!(matches!(
            CodecKey::from_base64("not!!base64"),
            Err(KeyError::InvalidEncoding)
        ));
    }

    #[test]
    fn from_base64_rejects_short_material() {
        let encoded = STANDARD.encode([0u8; 16]);
        assert!(matches!(
            CodecKey::from_base64(&encoded),
            Err(KeyError::InvalidLength(16))
        ));
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = CodecKey::from_bytes(&[0xFFu8; KEY_LEN]).unwrap();
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("255"));
    }

    #[test]
    fn clone_is_independent() {
        let key = CodecKey::from_bytes(&[0x33u8; KEY_LEN]).unwrap();
        let clone = key.clone();
        drop(key);
        assert_eq!(clone.as_bytes(), &[0x33u8; KEY_LEN]);
    }
}
