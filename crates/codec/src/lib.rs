//! Field-level authenticated-encryption codec for PII records.
//!
//! Before an agent, lead, deal, or meeting record reaches the shared document
//! store, every human-readable field in it is individually encrypted under a
//! single process-wide 256-bit key; on read the same fields are decrypted
//! transparently. This crate provides the two layers that do that work:
//!
//! - [`FieldCipher`] — AES-256-GCM-SIV over one string, fresh random 96-bit
//!   nonce per call, output `base64(nonce || ciphertext || tag)`.
//! - [`FieldCodec`] — recursive traversal of a [`serde_json::Value`] that
//!   applies the scalar cipher to every string leaf while preserving shape,
//!   keys, list order, and all non-string scalars.
//!
//! Deciding *which* fields of a record pass through the codec is the
//! caller's policy; the codec transforms whatever subtree it is handed.
//!
//! Decryption is deliberately infallible: values that fail base64 decoding
//! or tag verification are passed through unchanged (see [`Decrypted`]), so
//! records written before encryption was introduced keep loading instead of
//! breaking on one unreadable field.
//!
//! ```
//! use field_codec::{CodecKey, FieldCodec};
//! use serde_json::json;
//!
//! let key = CodecKey::from_bytes(&[0x42; 32]).unwrap();
//! let codec = FieldCodec::new(&key);
//!
//! let record = json!({"name": "Ann", "age": 30});
//! let stored = codec.encrypt_record(record.clone()).unwrap();
//! assert_ne!(stored["name"], record["name"]);
//! assert_eq!(stored["age"], record["age"]);
//! assert_eq!(codec.decrypt_record(stored), record);
//! ```

pub mod config;
pub mod crypto;
pub mod key;
pub mod record;

pub use config::CodecConfig;
pub use crypto::cipher::{CipherError, Decrypted, FallbackReason, FieldCipher};
pub use key::{derive::derive_key, CodecKey, KeyError};
pub use record::FieldCodec;
