//! HMAC-SHA256 verification of payment-processor webhook signatures.
//!
//! Verification operates on the exact raw request bytes, before any JSON
//! decoding: re-serialization is not guaranteed to be byte-identical to the
//! original transmission. The surrounding HTTP layer passes the body and the
//! signature header value straight through and maps a rejection to a 4xx
//! response without processing the payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64-encoded HMAC-SHA256 signature over `raw_body`.
///
/// This is the same construction the processor applies on its side; it is
/// exposed for signing outbound calls and for tests that forge valid inbound
/// requests.
pub fn sign(raw_body: &[u8], shared_secret: &[u8]) -> String {
    STANDARD.encode(compute_mac(raw_body, shared_secret))
}

/// Verify a presented signature against `raw_body` under `shared_secret`.
///
/// The MAC bytes are compared in constant time; a naive early-exit equality
/// check would leak match length through timing. A mismatched, malformed, or
/// empty `presented_signature` returns `false` — this function never panics
/// and never errors on attacker-controlled input.
pub fn verify(raw_body: &[u8], presented_signature: &str, shared_secret: &[u8]) -> bool {
    let presented = match STANDARD.decode(presented_signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let expected = compute_mac(raw_body, shared_secret);

    // The length of a well-formed signature is public (always one SHA-256
    // block); only the byte comparison itself must be constant-time.
    if presented.len() != expected.len() {
        return false;
    }
    expected.as_slice().ct_eq(&presented).into()
}

fn compute_mac(raw_body: &[u8], shared_secret: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(shared_secret).expect("HMAC accepts keys of any length");
    mac.update(raw_body);
    mac.finalize().into_bytes().to_vec()
}
