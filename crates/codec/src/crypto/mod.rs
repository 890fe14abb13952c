//! AES-256-GCM-SIV field encryption primitives.
//!
//! This module is intentionally free of configuration and serde dependencies.
//! It provides the low-level encrypt/decrypt operations used by the record
//! codec.
//!
//! # Blob format
//!
//! ```text
//! base64(nonce[12 bytes] || ciphertext[n bytes] || tag[16 bytes])
//! ```
//!
//! One opaque string per encrypted field, safe to store wherever the original
//! plaintext string was stored.

pub mod cipher;

pub use cipher::{CipherError, Decrypted, FallbackReason, FieldCipher};
pub use cipher::{KEY_LEN, NONCE_LEN, TAG_LEN};
