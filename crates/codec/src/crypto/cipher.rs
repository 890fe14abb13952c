//! AES-256-GCM-SIV encryption and decryption of individual string fields.
//!
//! Every encryption call draws a fresh 96-bit nonce from the OS CSPRNG, so
//! two encryptions of the same plaintext never produce the same blob. The
//! nonce travels inside the blob; nothing is cached between calls.
//!
//! Decryption never fails. A value that cannot be base64-decoded, is too
//! short to carry a nonce and tag, or fails tag verification is returned
//! unchanged as [`Decrypted::Fallback`], so fields written before encryption
//! was introduced keep rendering as-is instead of breaking the whole record.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::{debug, warn};

use crate::key::CodecKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
///
/// Only encryption can fail; decryption resolves every failure into
/// [`Decrypted::Fallback`].
#[derive(Debug, Error)]
pub enum CipherError {
    /// The AEAD primitive could not complete the encryption call.
    #[error("aead encryption failed")]
    EncryptFailure,
}

/// Why a decryption call returned its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The value is not valid base64 — almost certainly legacy plaintext.
    InvalidEncoding,
    /// The decoded bytes cannot hold a nonce and a tag.
    TooShort,
    /// Tag verification failed: wrong key, tampered blob, or foreign data.
    AuthenticationFailed,
    /// The tag verified but the plaintext is not valid UTF-8.
    InvalidUtf8,
}

/// Result of a decryption call.
///
/// Callers that need to distinguish "actually decrypted" from "passed
/// through" can match on the variant; callers that only want the displayable
/// string use [`Decrypted::into_string`]. Whether a
/// [`FallbackReason::AuthenticationFailed`] event should be surfaced to the
/// user differently from untouched legacy plaintext is host policy; the codec
/// only reports the distinction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decrypted {
    /// Authenticated decryption succeeded.
    Plaintext(String),
    /// The input could not be decrypted and was returned unchanged.
    Fallback {
        /// The untouched input value.
        original: String,
        /// Why decryption fell back.
        reason: FallbackReason,
    },
}

impl Decrypted {
    /// Consume the result, yielding the decrypted plaintext or the untouched
    /// original.
    pub fn into_string(self) -> String {
        match self {
            Decrypted::Plaintext(s) => s,
            Decrypted::Fallback { original, .. } => original,
        }
    }

    /// Borrow the decrypted plaintext or the untouched original.
    pub fn as_str(&self) -> &str {
        match self {
            Decrypted::Plaintext(s) => s,
            Decrypted::Fallback { original, .. } => original,
        }
    }

    /// Returns `true` if the value was actually decrypted rather than passed
    /// through.
    ///
    /// The empty string is the one exception: it is a no-op on both the
    /// encrypt and decrypt side (never ciphertext, nothing to protect), and
    /// reports as [`Decrypted::Plaintext`] here even though no AEAD call was
    /// made.
    pub fn was_decrypted(&self) -> bool {
        matches!(self, Decrypted::Plaintext(_))
    }
}

/// Scalar cipher bound to one 256-bit key.
///
/// The AEAD instance is built once at construction; clones share nothing
/// mutable, so the cipher is safe to use from any number of threads at once.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256GcmSiv,
}

impl FieldCipher {
    /// Build a cipher from the given key. The key bytes are expanded into
    /// round keys here and not retained.
    pub fn new(key: &CodecKey) -> Self {
        Self {
            cipher: Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(key.as_bytes())),
        }
    }

    /// Encrypt one string field into a `base64(nonce || ciphertext || tag)`
    /// blob.
    ///
    /// The empty string is returned unchanged: optional fields are frequently
    /// empty, and an empty value carries nothing to protect.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::EncryptFailure`] if the AEAD call fails.
    /// Plaintext is never silently returned in place of ciphertext.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        // Use OsRng for a cryptographically secure random nonce.
        use aes_gcm_siv::aead::rand_core::RngCore;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptFailure)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(blob))
    }

    /// Decrypt one field value.
    ///
    /// Never fails: anything that cannot be authenticated and decoded comes
    /// back as [`Decrypted::Fallback`] carrying the untouched input. An empty
    /// input mirrors the encrypt no-op and is returned as empty plaintext.
    ///
    /// Log entries carry only value lengths and reasons, never field
    /// contents.
    pub fn decrypt(&self, blob: &str) -> Decrypted {
        if blob.is_empty() {
            return Decrypted::Plaintext(String::new());
        }

        let bytes = match STANDARD.decode(blob) {
            Ok(b) => b,
            Err(_) => {
                debug!(value_len = blob.len(), "field value is not base64; passing through");
                return fallback(blob, FallbackReason::InvalidEncoding);
            }
        };

        if bytes.len() < NONCE_LEN + TAG_LEN {
            debug!(
                decoded_len = bytes.len(),
                "field value too short to hold nonce and tag; passing through"
            );
            return fallback(blob, FallbackReason::TooShort);
        }

        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = match self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        {
            Ok(p) => p,
            Err(_) => {
                warn!(
                    value_len = blob.len(),
                    "field authentication failed: wrong key, tampered blob, or foreign data"
                );
                return fallback(blob, FallbackReason::AuthenticationFailed);
            }
        };

        match String::from_utf8(plaintext) {
            Ok(s) => Decrypted::Plaintext(s),
            Err(_) => {
                warn!(value_len = blob.len(), "decrypted field is not valid UTF-8; passing through");
                fallback(blob, FallbackReason::InvalidUtf8)
            }
        }
    }
}

fn fallback(original: &str, reason: FallbackReason) -> Decrypted {
    Decrypted::Fallback {
        original: original.to_owned(),
        reason,
    }
}
