//! Configuration loading and validation for the codec host process.
//!
//! All values are read from environment variables at startup. Exactly one key
//! source must be configured: either a base64-encoded raw key or a
//! passphrase to derive one from. The process should exit with a clear error
//! message if the configuration is missing or ambiguous.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::key::{derive::derive_key, CodecKey};

/// Validated codec configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    /// Base64-encoded 256-bit field key. Mutually exclusive with
    /// `field_passphrase`.
    #[serde(default)]
    pub field_key_b64: Option<String>,

    /// Passphrase from which the field key is derived via HKDF-SHA256.
    /// Mutually exclusive with `field_key_b64`.
    #[serde(default)]
    pub field_passphrase: Option<String>,

    /// Salt for passphrase derivation. Changing it orphans existing blobs.
    #[serde(default = "default_key_salt")]
    pub field_key_salt: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_key_salt() -> String {
    "field-codec/v1".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl CodecConfig {
    /// Load and validate configuration from environment variables
    /// (`FIELD_KEY_B64`, `FIELD_PASSPHRASE`, `FIELD_KEY_SALT`, `LOG_LEVEL`).
    ///
    /// # Errors
    ///
    /// Returns an error if no key source (or more than one) is configured, or
    /// if any value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: CodecConfig = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first
    /// failure.
    fn validate(&self) -> Result<()> {
        match (&self.field_key_b64, &self.field_passphrase) {
            (Some(_), Some(_)) => {
                anyhow::bail!("FIELD_KEY_B64 and FIELD_PASSPHRASE are mutually exclusive")
            }
            (None, None) => {
                anyhow::bail!("either FIELD_KEY_B64 or FIELD_PASSPHRASE is required")
            }
            (Some(key), None) => ensure_non_empty(key, "FIELD_KEY_B64")?,
            (None, Some(passphrase)) => ensure_non_empty(passphrase, "FIELD_PASSPHRASE")?,
        }
        ensure_non_empty(&self.field_key_salt, "FIELD_KEY_SALT")?;
        Ok(())
    }

    /// Resolve the configured key source into a [`CodecKey`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured key material is malformed or no
    /// source is set.
    pub fn load_key(&self) -> Result<CodecKey> {
        if let Some(encoded) = &self.field_key_b64 {
            return CodecKey::from_base64(encoded)
                .context("FIELD_KEY_B64 must be base64 of exactly 32 bytes");
        }
        if let Some(passphrase) = &self.field_passphrase {
            return derive_key(passphrase, self.field_key_salt.as_bytes())
                .context("failed to derive field key from FIELD_PASSPHRASE");
        }
        anyhow::bail!("no key source configured: set FIELD_KEY_B64 or FIELD_PASSPHRASE")
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
