//! OS-backed entropy behind a narrow trait seam.

use rand::{rngs::OsRng, TryRngCore};
use thiserror::Error;

/// The secure random source failed to produce bytes.
///
/// Fatal to the operation in progress: there is no fallback to a weaker
/// generator, anywhere in this crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("secure random source unavailable")]
pub struct EntropyError;

/// Supplier of cryptographically secure random bytes.
///
/// The cipher and the token generator take this as an explicit collaborator
/// so tests can drive the entropy-failure path with a mock.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] if the underlying source is exhausted or
    /// unavailable; `dest` must then be treated as garbage.
    fn fill(&self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system CSPRNG ([`OsRng`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl RandomSource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(dest).map_err(|_| EntropyError)
    }
}
