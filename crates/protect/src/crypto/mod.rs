//! AES-256-GCM field encryption primitives.
//!
//! This module is intentionally free of configuration and HTTP dependencies.
//! It provides the low-level encrypt/decrypt operations used by the
//! [`Protector`](crate::Protector) façade.
//!
//! # Ciphertext format
//!
//! ```text
//! <ivHex>:<tagHex>:<cipherHex>
//! ```
//!
//! All lowercase hexadecimal, exactly two `:` separators, no whitespace. The
//! delimited encoding keeps the stored value a single opaque string for the
//! storage layer and leaves room for a versioned successor format.

pub mod cipher;

pub use cipher::{
    decrypt_field, encrypt_field, CipherError, EncryptedPayload, FormatError, IV_LEN, TAG_LEN,
};
