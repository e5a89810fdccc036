//! Crate-level error type and the operator/user message split.

use thiserror::Error;

use crate::config::ConfigError;
use crate::crypto::cipher::{CipherError, FormatError};
use crate::entropy::EntropyError;
use crate::kdf::KdfError;

/// Top-level error for data-protection operations.
///
/// Operators see the full variant detail in logs; end users only ever see
/// [`ProtectError::user_message`], which deliberately describes nothing —
/// a format or integrity failure signals either data corruption or an
/// active attack, and neither belongs in a response body.
#[derive(Debug, Error)]
pub enum ProtectError {
    /// Startup configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Encryption or decryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Key derivation failed.
    #[error(transparent)]
    Kdf(#[from] KdfError),

    /// The secure random source failed.
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

impl From<FormatError> for ProtectError {
    fn from(e: FormatError) -> Self {
        ProtectError::Cipher(CipherError::Format(e))
    }
}

impl ProtectError {
    /// Generic end-user message; never varies with the failure.
    pub fn user_message(&self) -> &'static str {
        "cannot process request"
    }

    /// Short machine-readable kind for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtectError::Config(_) => "config",
            ProtectError::Cipher(CipherError::Format(_)) => "format",
            ProtectError::Cipher(CipherError::Integrity) => "integrity",
            ProtectError::Cipher(CipherError::Aead) => "aead",
            ProtectError::Cipher(CipherError::Entropy(_)) | ProtectError::Entropy(_) => "entropy",
            ProtectError::Kdf(_) => "kdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_variants() {
        assert_eq!(
            ProtectError::from(CipherError::Integrity).kind(),
            "integrity"
        );
        assert_eq!(ProtectError::from(FormatError::NotUtf8).kind(), "format");
        assert_eq!(ProtectError::from(EntropyError).kind(), "entropy");
        assert_eq!(ProtectError::from(KdfError::ZeroIterations).kind(), "kdf");
    }

    #[test]
    fn user_message_never_describes_the_failure() {
        for err in [
            ProtectError::from(CipherError::Integrity),
            ProtectError::from(FormatError::FieldCount(5)),
            ProtectError::from(EntropyError),
        ] {
            assert_eq!(err.user_message(), "cannot process request");
        }
    }

    #[test]
    fn display_preserves_inner_detail() {
        let err = ProtectError::from(FormatError::FieldCount(5));
        assert!(err.to_string().contains("3 colon-delimited fields"));
    }
}
