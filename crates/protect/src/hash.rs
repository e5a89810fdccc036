//! One-way hashing for equality indexing of protected values.

use sha2::{Digest, Sha256};

/// Lowercase-hex SHA-256 digest of `value ++ salt`.
///
/// Deterministic, so equal inputs can be matched (deduplication, lookup)
/// without storing or decrypting the original value. This is an index hash,
/// not a credential hash: it is fast on purpose and uses the fixed
/// process-wide salt. Password storage belongs to the authentication
/// collaborator, with a slow per-value-salted construction.
pub fn hash_value(value: &str, salt: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.update(salt);
    hex::encode(hasher.finalize())
}
