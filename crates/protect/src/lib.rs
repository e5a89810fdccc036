//! `protect` — the data-protection core of the dashboard.
//!
//! Everything the wider application needs to keep sensitive customer data
//! (payment references, customer identifiers) safe at rest and to trust
//! inbound payment-processor webhooks:
//!
//! - [`kdf`] — PBKDF2 derivation of the AES-256 key from the configured secret
//! - [`crypto`] — authenticated field encryption (AES-256-GCM, `iv:tag:cipher`)
//! - [`hash`] — one-way equality-index hashing of protected values
//! - [`token`] — secure random token generation
//! - [`mask`] — display masking of sensitive strings
//! - [`webhook`] — constant-time HMAC-SHA256 webhook signature verification
//!
//! The subsystem is fully synchronous and stateless over its inputs; the only
//! shared state is the read-mostly derived-key memo. HTTP serving, storage,
//! and session handling are collaborators owned by the host application.
//!
//! Typical wiring:
//!
//! ```no_run
//! use protect::{ProtectionConfig, Protector};
//!
//! let cfg = ProtectionConfig::from_env().expect("PROTECT_* configuration invalid");
//! let protector = Protector::new(cfg);
//!
//! let stored = protector.encrypt_field("4111 1111 1111 1111").unwrap();
//! let back = protector.decrypt_field(&stored).unwrap();
//! assert_eq!(back, "4111 1111 1111 1111");
//! ```

pub mod config;
pub mod crypto;
pub mod entropy;
pub mod error;
pub mod hash;
pub mod kdf;
pub mod mask;
pub mod protector;
pub mod token;
pub mod webhook;

pub use config::{ConfigError, ProtectionConfig, SecretMode};
pub use crypto::cipher::{decrypt_field, encrypt_field, CipherError, EncryptedPayload, FormatError};
pub use entropy::{EntropyError, OsEntropy, RandomSource};
pub use error::ProtectError;
pub use kdf::{derive_key, DerivedKey, KeyCache};
pub use protector::Protector;
