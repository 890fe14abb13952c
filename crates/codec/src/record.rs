//! Structural codec: recursive field encryption over arbitrarily shaped
//! records.
//!
//! The traversal matches exhaustively on [`serde_json::Value`]: string leaves
//! go through the scalar cipher, lists and maps are rebuilt with the same
//! order and key set, and null/bool/number leaves pass through untouched.
//!
//! Slicing a domain record (agent, lead, deal, meeting) into "fields to
//! encrypt" vs. "fields to leave alone" is the caller's policy; the codec
//! transforms whatever subtree it is handed. That boundary keeps the codec
//! general and independently testable.

use serde_json::{Map, Value};

use crate::crypto::cipher::{CipherError, Decrypted, FieldCipher};
use crate::key::CodecKey;

/// Field-level codec bound to one key for the life of the process.
///
/// Construct once from configuration and share freely: the codec is `Clone`
/// and `Send + Sync`, every call is stateless, and concurrent calls on
/// distinct records never interfere.
#[derive(Clone)]
pub struct FieldCodec {
    cipher: FieldCipher,
}

impl FieldCodec {
    /// Build a codec bound to `key`.
    pub fn new(key: &CodecKey) -> Self {
        Self {
            cipher: FieldCipher::new(key),
        }
    }

    /// Encrypt one scalar string field. See [`FieldCipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::EncryptFailure`] if the AEAD call fails.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, CipherError> {
        self.cipher.encrypt(plaintext)
    }

    /// Decrypt one scalar field value. Never fails; see [`Decrypted`].
    pub fn decrypt_field(&self, value: &str) -> Decrypted {
        self.cipher.decrypt(value)
    }

    /// Encrypt every string leaf of `value`, preserving shape.
    ///
    /// Keys, list order and length, and non-string scalars (numbers,
    /// booleans, null) are preserved bit-for-bit; only string leaves change.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::EncryptFailure`] if any leaf encryption fails.
    /// No partially transformed record is returned on failure.
    pub fn encrypt_record(&self, value: Value) -> Result<Value, CipherError> {
        Ok(match value {
            Value::String(s) => Value::String(self.cipher.encrypt(&s)?),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.encrypt_record(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, self.encrypt_record(v)?);
                }
                Value::Object(out)
            }
            // Null, Bool, Number: nothing human-readable to protect.
            other => other,
        })
    }

    /// Decrypt every string leaf of `value`, preserving shape.
    ///
    /// Never fails: leaves that cannot be decrypted (legacy plaintext,
    /// foreign data, tampered blobs) are kept unchanged, so running this on a
    /// record it never encrypted — or running it twice — is a no-op.
    pub fn decrypt_record(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.cipher.decrypt(&s).into_string()),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.decrypt_record(item))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k, self.decrypt_record(v));
                }
                Value::Object(out)
            }
            other => other,
        }
    }
}
