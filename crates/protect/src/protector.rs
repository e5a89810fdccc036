//! [`Protector`]: the wired façade over the data-protection core.
//!
//! Owns the validated configuration, the memoized derived key, and the OS
//! entropy source, and exposes the operations the application calls. All
//! failure logging records the operation and error kind only — never the
//! value, the payload, or any secret.

use tracing::{info, warn};

use crate::config::ProtectionConfig;
use crate::crypto::cipher::{self, CipherError, EncryptedPayload, FormatError};
use crate::entropy::OsEntropy;
use crate::error::ProtectError;
use crate::kdf::{DerivedKey, KeyCache};
use crate::mask::DEFAULT_VISIBLE_SUFFIX;
use crate::token::DEFAULT_TOKEN_LEN;
use crate::{hash, mask, token, webhook};

/// Application-facing handle, cheap to clone and share across request
/// handlers. Every operation is a bounded synchronous computation; the only
/// shared state is the read-mostly key cache.
#[derive(Clone)]
pub struct Protector {
    config: ProtectionConfig,
    key_cache: KeyCache,
    entropy: OsEntropy,
}

impl Protector {
    /// Wire a [`Protector`] from a validated configuration.
    pub fn new(config: ProtectionConfig) -> Self {
        info!(
            mode = ?config.secret_mode,
            kdf_iterations = config.kdf_iterations,
            "data-protection core initialised"
        );
        Self {
            config,
            key_cache: KeyCache::new(),
            entropy: OsEntropy,
        }
    }

    /// Encrypt a sensitive field for storage, returning the
    /// `iv:tag:cipher` string the storage layer persists verbatim.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, ProtectError> {
        let key = self.derived_key()?;
        let payload = cipher::encrypt_field(plaintext, &key, &self.entropy)
            .map_err(|e| self.log_failure("encrypt", e))?;
        Ok(payload.to_string())
    }

    /// Decrypt a stored `iv:tag:cipher` string back to the original value.
    ///
    /// A failed decrypt deterministically fails again with the same inputs;
    /// callers surface [`ProtectError::user_message`] and do not retry.
    pub fn decrypt_field(&self, stored: &str) -> Result<String, ProtectError> {
        let key = self.derived_key()?;
        let payload: EncryptedPayload = stored
            .parse()
            .map_err(|e: FormatError| self.log_failure("decrypt", CipherError::Format(e)))?;
        cipher::decrypt_field(&payload, &key).map_err(|e| self.log_failure("decrypt", e))
    }

    /// Equality-index hash of a sensitive value under the configured salt.
    pub fn hash_value(&self, value: &str) -> String {
        hash::hash_value(value, &self.config.salt)
    }

    /// Generate a random token of the default length
    /// ([`DEFAULT_TOKEN_LEN`] bytes, hex-encoded).
    pub fn generate_token(&self) -> Result<String, ProtectError> {
        self.generate_token_of(DEFAULT_TOKEN_LEN)
    }

    /// Generate a random token of `length` bytes (hex-encoded).
    pub fn generate_token_of(&self, length: usize) -> Result<String, ProtectError> {
        token::generate_token(length, &self.entropy).map_err(|e| {
            warn!(operation = "token", kind = "entropy", "data-protection operation failed");
            ProtectError::from(e)
        })
    }

    /// Display-mask a sensitive value with the default visible suffix.
    pub fn mask(&self, value: &str) -> String {
        mask::mask(value, DEFAULT_VISIBLE_SUFFIX)
    }

    /// Display-mask a sensitive value, leaving the last `visible_suffix`
    /// characters readable.
    pub fn mask_with_suffix(&self, value: &str, visible_suffix: usize) -> String {
        mask::mask(value, visible_suffix)
    }

    /// Verify an inbound webhook signature over the raw body bytes, exactly
    /// as received and prior to any JSON decoding.
    pub fn verify_webhook(&self, raw_body: &[u8], presented_signature: &str) -> bool {
        let accepted = webhook::verify(raw_body, presented_signature, &self.config.webhook_secret);
        if !accepted {
            // Body and signature are deliberately absent from the event.
            warn!(operation = "webhook", "webhook signature rejected");
        }
        accepted
    }

    fn derived_key(&self) -> Result<DerivedKey, ProtectError> {
        self.key_cache
            .get_or_derive(
                &self.config.secret,
                &self.config.salt,
                self.config.kdf_iterations,
            )
            .map_err(ProtectError::from)
    }

    fn log_failure(&self, operation: &'static str, e: CipherError) -> ProtectError {
        let e = ProtectError::from(e);
        warn!(operation, kind = e.kind(), "data-protection operation failed");
        e
    }
}
