//! Configuration loading and validation for the data-protection core.
//!
//! All values are read from `PROTECT_*` environment variables once at
//! startup and validated fail-fast: a durable deployment with a missing
//! secret refuses to start instead of silently falling back to an ephemeral
//! key that would strand every ciphertext after a restart.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::entropy::{EntropyError, OsEntropy, RandomSource};
use crate::kdf::MIN_ITERATIONS;

/// Configuration failures detected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment could not be read or deserialized.
    #[error("invalid configuration environment: {0}")]
    Environment(String),

    /// A value required in durable mode is missing or empty.
    #[error("{0} is required and must not be empty in durable mode")]
    MissingValue(&'static str),

    /// The iteration count is below the floor for the selected mode.
    #[error("PROTECT_KDF_ITERATIONS must be >= {1}, got {0}")]
    WeakIterations(u32, u32),

    /// `PROTECT_SECRET_MODE` is neither `durable` nor `ephemeral`.
    #[error("PROTECT_SECRET_MODE must be `durable` or `ephemeral`, got {0:?}")]
    UnknownMode(String),

    /// Ephemeral mode could not draw a secret from the OS CSPRNG.
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

/// Lifecycle mode for the root secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretMode {
    /// Ciphertext must survive restarts: secret, salt, and webhook secret
    /// are required, and the KDF iteration floor is enforced.
    Durable,
    /// Local development only, selected explicitly. A missing secret is
    /// drawn fresh from the OS CSPRNG at startup, so nothing encrypted in
    /// this mode is readable after a restart or from another process.
    Ephemeral,
}

/// Raw environment shape, prior to validation.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    secret: String,
    #[serde(default)]
    salt: String,
    #[serde(default = "default_kdf_iterations")]
    kdf_iterations: u32,
    #[serde(default)]
    webhook_secret: String,
    #[serde(default = "default_secret_mode")]
    secret_mode: String,
}

fn default_kdf_iterations() -> u32 {
    MIN_ITERATIONS
}
fn default_secret_mode() -> String {
    "durable".into()
}

/// Validated, immutable data-protection configuration.
///
/// Constructed once at startup and threaded explicitly through the
/// subsystem — there is no module-level secret state. The secret is never
/// logged or persisted by this crate; the salt is not secret but must stay
/// fixed for the lifetime of the data encrypted under it.
#[derive(Clone)]
pub struct ProtectionConfig {
    /// Root trust material for key derivation. **Required in durable mode.**
    pub secret: Vec<u8>,
    /// Key-derivation and index-hash salt. **Required in durable mode.**
    pub salt: Vec<u8>,
    /// PBKDF2 iteration count (≥ [`MIN_ITERATIONS`] in durable mode).
    pub kdf_iterations: u32,
    /// Shared secret for webhook signature verification. **Required in
    /// durable mode.**
    pub webhook_secret: Vec<u8>,
    /// Secret lifecycle mode; ephemeral is an explicit opt-in.
    pub secret_mode: SecretMode,
}

impl std::fmt::Debug for ProtectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets never appear in logs or debug output.
        f.debug_struct("ProtectionConfig")
            .field("secret", &"[REDACTED]")
            .field("salt_len", &self.salt.len())
            .field("kdf_iterations", &self.kdf_iterations)
            .field("webhook_secret", &"[REDACTED]")
            .field("secret_mode", &self.secret_mode)
            .finish()
    }
}

impl ProtectionConfig {
    /// Load and validate configuration from `PROTECT_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any variable is absent where required,
    /// cannot be parsed, or fails validation for the selected mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("PROTECT"))
            .build()
            .map_err(|e| ConfigError::Environment(e.to_string()))?;

        let raw: RawConfig = cfg
            .try_deserialize()
            .map_err(|e| ConfigError::Environment(e.to_string()))?;

        Self::from_raw(raw, &OsEntropy)
    }

    fn from_raw(raw: RawConfig, entropy: &dyn RandomSource) -> Result<Self, ConfigError> {
        let secret_mode = match raw.secret_mode.as_str() {
            "durable" => SecretMode::Durable,
            "ephemeral" => SecretMode::Ephemeral,
            other => return Err(ConfigError::UnknownMode(other.to_owned())),
        };

        let mut cfg = Self {
            secret: raw.secret.into_bytes(),
            salt: raw.salt.into_bytes(),
            kdf_iterations: raw.kdf_iterations,
            webhook_secret: raw.webhook_secret.into_bytes(),
            secret_mode,
        };
        cfg.validate()?;

        if cfg.secret_mode == SecretMode::Ephemeral && cfg.secret.is_empty() {
            let mut secret = vec![0u8; 32];
            entropy.fill(&mut secret)?;
            cfg.secret = secret;
            warn!(
                "ephemeral secret mode: encrypted values will not be readable \
                 after a restart or from another process"
            );
        }
        Ok(cfg)
    }

    /// Validate all fields for the selected mode, returning a descriptive
    /// error on the first failure.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.secret_mode {
            SecretMode::Durable => {
                ensure_non_empty(&self.secret, "PROTECT_SECRET")?;
                ensure_non_empty(&self.salt, "PROTECT_SALT")?;
                ensure_non_empty(&self.webhook_secret, "PROTECT_WEBHOOK_SECRET")?;
                if self.kdf_iterations < MIN_ITERATIONS {
                    return Err(ConfigError::WeakIterations(
                        self.kdf_iterations,
                        MIN_ITERATIONS,
                    ));
                }
            }
            SecretMode::Ephemeral => {
                if self.kdf_iterations == 0 {
                    return Err(ConfigError::WeakIterations(0, 1));
                }
            }
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &[u8], name: &'static str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingValue(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::MockRandomSource;

    fn durable_raw() -> RawConfig {
        RawConfig {
            secret: "correct horse battery staple".into(),
            salt: "tenant-dashboard-v1".into(),
            kdf_iterations: default_kdf_iterations(),
            webhook_secret: "whsec_live_91ac".into(),
            secret_mode: default_secret_mode(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_kdf_iterations(), MIN_ITERATIONS);
        assert_eq!(default_secret_mode(), "durable");
    }

    #[test]
    fn durable_config_validates() {
        let cfg = ProtectionConfig::from_raw(durable_raw(), &OsEntropy).unwrap();
        assert_eq!(cfg.secret_mode, SecretMode::Durable);
        assert_eq!(cfg.kdf_iterations, MIN_ITERATIONS);
    }

    #[test]
    fn durable_rejects_empty_secret() {
        let mut raw = durable_raw();
        raw.secret = String::new();
        let err = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue("PROTECT_SECRET")));
    }

    #[test]
    fn durable_rejects_empty_salt() {
        let mut raw = durable_raw();
        raw.salt = String::new();
        let err = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue("PROTECT_SALT")));
    }

    #[test]
    fn durable_rejects_empty_webhook_secret() {
        let mut raw = durable_raw();
        raw.webhook_secret = String::new();
        let err = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingValue("PROTECT_WEBHOOK_SECRET")
        ));
    }

    #[test]
    fn durable_rejects_weak_iterations() {
        let mut raw = durable_raw();
        raw.kdf_iterations = 10_000;
        let err = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap_err();
        assert!(matches!(err, ConfigError::WeakIterations(10_000, _)));
    }

    #[test]
    fn unknown_mode_rejected() {
        let mut raw = durable_raw();
        raw.secret_mode = "yolo".into();
        let err = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode(_)));
    }

    #[test]
    fn ephemeral_draws_secret_from_entropy() {
        let mut raw = durable_raw();
        raw.secret = String::new();
        raw.secret_mode = "ephemeral".into();

        let mut entropy = MockRandomSource::new();
        entropy.expect_fill().returning(|dest: &mut [u8]| {
            dest.fill(0x42);
            Ok(())
        });
        let cfg = ProtectionConfig::from_raw(raw, &entropy).unwrap();
        assert_eq!(cfg.secret, vec![0x42; 32]);
        assert_eq!(cfg.secret_mode, SecretMode::Ephemeral);
    }

    #[test]
    fn ephemeral_keeps_explicit_secret() {
        let mut raw = durable_raw();
        raw.secret_mode = "ephemeral".into();
        let cfg = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap();
        assert_eq!(cfg.secret, b"correct horse battery staple".to_vec());
    }

    #[test]
    fn ephemeral_allows_fast_iterations_but_not_zero() {
        let mut raw = durable_raw();
        raw.secret_mode = "ephemeral".into();
        raw.kdf_iterations = 1_000;
        assert!(ProtectionConfig::from_raw(raw, &OsEntropy).is_ok());

        let mut raw = durable_raw();
        raw.secret_mode = "ephemeral".into();
        raw.kdf_iterations = 0;
        let err = ProtectionConfig::from_raw(raw, &OsEntropy).unwrap_err();
        assert!(matches!(err, ConfigError::WeakIterations(0, 1)));
    }

    #[test]
    fn ephemeral_entropy_failure_is_fatal() {
        let mut raw = durable_raw();
        raw.secret = String::new();
        raw.secret_mode = "ephemeral".into();

        let mut entropy = MockRandomSource::new();
        entropy.expect_fill().returning(|_| Err(EntropyError));
        let err = ProtectionConfig::from_raw(raw, &entropy).unwrap_err();
        assert!(matches!(err, ConfigError::Entropy(_)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = ProtectionConfig::from_raw(durable_raw(), &OsEntropy).unwrap();
        let debug = format!("{cfg:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("correct horse"));
        assert!(!debug.contains("whsec_live_91ac"));
    }
}
