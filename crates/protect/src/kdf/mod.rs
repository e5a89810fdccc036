//! PBKDF2 derivation of the symmetric encryption key.
//!
//! The configured secret is low-entropy (an operator-chosen passphrase), so
//! the derivation is deliberately slow — at least [`MIN_ITERATIONS`] rounds
//! in production — to resist offline brute force. Derivation is deterministic
//! over `(secret, salt, iterations)`; changing the salt invalidates every
//! ciphertext produced under the old one.
//!
//! Callers are expected to go through [`KeyCache`] rather than re-deriving
//! on every operation.

pub mod cache;

pub use cache::KeyCache;

use hmac::Hmac;
use sha2::Sha256;
use thiserror::Error;

/// Byte length of a derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Production floor for the PBKDF2 iteration count.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Errors produced by the key-derivation layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KdfError {
    /// The iteration count was zero.
    #[error("PBKDF2 iteration count must be >= 1")]
    ZeroIterations,

    /// The underlying PRF rejected its inputs.
    #[error("PBKDF2 derivation failed: {0}")]
    Derivation(String),
}

/// Fixed-size buffer holding exactly [`KEY_LEN`] derived key bytes.
///
/// Lives only as long as the operations that need it; the memory is
/// overwritten with zeroes on drop to minimise the window during which key
/// material sits in RAM.
#[derive(Clone)]
pub struct DerivedKey(Box<[u8; KEY_LEN]>);

impl DerivedKey {
    /// Raw key bytes, for handing to the cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a [`KEY_LEN`]-byte key from `secret` and `salt` via
/// PBKDF2-HMAC-SHA256.
///
/// Deterministic: identical inputs always produce the identical key. An
/// empty secret still derives — secret quality is the configuration layer's
/// contract, not this function's.
///
/// # Errors
///
/// Returns [`KdfError::ZeroIterations`] if `iterations` is zero.
pub fn derive_key(secret: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey, KdfError> {
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }
    let mut out = Box::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(secret, salt, iterations, &mut out[..])
        .map_err(|e| KdfError::Derivation(e.to_string()))?;
    Ok(DerivedKey(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_key(b"passphrase", b"salt", 1_000).unwrap();
        let b = derive_key(b"passphrase", b"salt", 1_000).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_salt_changes_key() {
        let a = derive_key(b"passphrase", b"salt-1", 1_000).unwrap();
        let b = derive_key(b"passphrase", b"salt-2", 1_000).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_iterations_change_key() {
        let a = derive_key(b"passphrase", b"salt", 1_000).unwrap();
        let b = derive_key(b"passphrase", b"salt", 1_001).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn empty_secret_still_derives() {
        let a = derive_key(b"", b"salt", 1_000).unwrap();
        let b = derive_key(b"", b"salt", 1_000).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(matches!(
            derive_key(b"passphrase", b"salt", 0),
            Err(KdfError::ZeroIterations)
        ));
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = derive_key(b"passphrase", b"salt", 1_000).unwrap();
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
