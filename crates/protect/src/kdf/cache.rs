//! [`KeyCache`]: process-lifetime memoization of the derived key.

use std::sync::{Arc, PoisonError, RwLock};

use sha2::{Digest, Sha256};

use super::{derive_key, DerivedKey, KdfError};

/// A memoized derivation together with a fingerprint of its inputs.
///
/// The fingerprint is a SHA-256 over `(secret, salt, iterations)` with
/// length framing, so the secret itself is never held as a lookup key.
struct CachedKey {
    fingerprint: [u8; 32],
    key: DerivedKey,
}

/// Thread-safe memo for the expensive PBKDF2 derivation.
///
/// Derivation runs at ≥100k iterations in production, far too slow to repeat
/// per operation, so request handlers share one cache per process. Readers
/// take a short read lock and clone the 32-byte key; the write lock is taken
/// only on first population or when the inputs change.
#[derive(Clone)]
pub struct KeyCache {
    inner: Arc<RwLock<Option<CachedKey>>>,
}

impl KeyCache {
    /// Create a new, empty [`KeyCache`].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Return the memoized key for `(secret, salt, iterations)`, deriving it
    /// on first use or whenever the inputs differ from the cached ones.
    ///
    /// # Errors
    ///
    /// Returns [`KdfError`] if derivation itself fails (zero iterations).
    pub fn get_or_derive(
        &self,
        secret: &[u8],
        salt: &[u8],
        iterations: u32,
    ) -> Result<DerivedKey, KdfError> {
        let fp = fingerprint(secret, salt, iterations);

        // No user code runs while the lock is held, so poisoning cannot
        // occur; recover the guard rather than panic if it somehow does.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = guard.as_ref() {
            if cached.fingerprint == fp {
                return Ok(cached.key.clone());
            }
        }
        drop(guard);

        // Derive outside any lock; PBKDF2 takes tens of milliseconds.
        let key = derive_key(secret, salt, iterations)?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedKey {
            fingerprint: fp,
            key: key.clone(),
        });
        Ok(key)
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}

fn fingerprint(secret: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update((secret.len() as u64).to_be_bytes());
    hasher.update(secret);
    hasher.update((salt.len() as u64).to_be_bytes());
    hasher.update(salt);
    hasher.update(iterations.to_be_bytes());
    hasher.finalize().into()
}
