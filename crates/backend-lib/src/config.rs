// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::fmt;
use std::path::Path;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::auth::{CredentialVerifier, MIN_PASSWORD_LENGTH};

/// Environment variable prefix; nested keys use `__`, e.g. `MINIBLOG_AUTH__JWT_SECRET`
pub const ENV_PREFIX: &str = "MINIBLOG_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
    /// Token signing
    pub auth: AuthSettings,
    /// Password policy and hashing cost
    #[serde(default)]
    pub password: PasswordSettings,
}

/// Token signing settings
#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for HS256. Required; there is no default.
    pub jwt_secret: String,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Password requirements and scrypt cost
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    /// Minimum password length, in characters
    pub min_length: usize,
    /// scrypt CPU/memory cost, as log2(N)
    pub scrypt_log_n: u8,
    /// scrypt block size
    pub scrypt_r: u32,
    /// scrypt parallelism
    pub scrypt_p: u32,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            scrypt_log_n: scrypt::Params::RECOMMENDED_LOG_N,
            scrypt_r: scrypt::Params::RECOMMENDED_R,
            scrypt_p: scrypt::Params::RECOMMENDED_P,
        }
    }
}

impl PasswordSettings {
    /// Build the credential verifier these settings describe
    pub fn verifier(&self) -> Result<CredentialVerifier> {
        Ok(CredentialVerifier::with_cost(
            self.scrypt_log_n,
            self.scrypt_r,
            self.scrypt_p,
        )?)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Settings with defaults for everything but the signing secret
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            auth: AuthSettings {
                jwt_secret: jwt_secret.into(),
            },
            password: PasswordSettings::default(),
        }
    }

    /// Load settings from `config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings from a TOML file, then environment variables.
    ///
    /// Fails if no signing secret is configured.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            bail!("auth.jwt_secret must be set");
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("unknown log level {:?}", self.log_level);
        }

        if self.password.min_length < MIN_PASSWORD_LENGTH {
            bail!(
                "password.min_length must be at least {MIN_PASSWORD_LENGTH}, got {}",
                self.password.min_length
            );
        }

        // Surfaces bad scrypt parameters at startup rather than at first login
        self.password.verifier()?;
        Ok(())
    }
}
