//! Secure random token generation (session IDs, API tokens).

use crate::entropy::{EntropyError, RandomSource};

/// Default token length in bytes (64 hex characters).
pub const DEFAULT_TOKEN_LEN: usize = 32;

/// Generate `length` random bytes as a lowercase hex string of `2 * length`
/// characters.
///
/// Tokens come straight from the entropy source and are never derived from
/// any secret; unpredictability is bounded only by the birthday bound of the
/// underlying CSPRNG.
///
/// # Errors
///
/// Returns [`EntropyError`] if the secure source fails. There is no fallback
/// to a non-cryptographic generator.
pub fn generate_token(length: usize, entropy: &dyn RandomSource) -> Result<String, EntropyError> {
    let mut bytes = vec![0u8; length];
    entropy.fill(&mut bytes)?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{MockRandomSource, OsEntropy};
    use std::collections::HashSet;

    #[test]
    fn output_length_is_twice_the_byte_count() {
        for len in [1, 16, DEFAULT_TOKEN_LEN, 64] {
            let token = generate_token(len, &OsEntropy).unwrap();
            assert_eq!(token.len(), 2 * len);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn entropy_failure_is_loud() {
        let mut entropy = MockRandomSource::new();
        entropy.expect_fill().returning(|_| Err(EntropyError));
        assert_eq!(generate_token(32, &entropy), Err(EntropyError));
    }

    #[test]
    fn ten_thousand_tokens_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let token = generate_token(DEFAULT_TOKEN_LEN, &OsEntropy).unwrap();
            assert!(seen.insert(token), "duplicate 32-byte token generated");
        }
    }

    #[test]
    fn byte_distribution_is_roughly_uniform() {
        // 10_000 tokens × 32 bytes = 320_000 samples, expected ~1_250 per
        // byte value. A count outside [625, 2500] is > 17 standard
        // deviations out and indicates a broken or biased source.
        let mut counts = [0u32; 256];
        for _ in 0..10_000 {
            let token = generate_token(DEFAULT_TOKEN_LEN, &OsEntropy).unwrap();
            for byte in hex::decode(token).unwrap() {
                counts[byte as usize] += 1;
            }
        }
        for (value, &count) in counts.iter().enumerate() {
            assert!(
                (625..=2_500).contains(&count),
                "byte value {value:#04x} appeared {count} times"
            );
        }
    }
}
