//! Application configuration.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults (simulation mode, 30 s timeout, `info` logging)
//! 2. an optional TOML file passed with `--config`
//! 3. `SHIFT_CHECKOUT_ENDPOINT` / `SHIFT_CHECKOUT_TIMEOUT_SECS`
//! 4. command-line flags (applied in `main`)
//!
//! ```toml
//! [remote]
//! endpoint = "https://script.google.com/macros/s/XXXX/exec"
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! file = "shift-checkout.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use checkout_core::remote::{DEFAULT_TIMEOUT, RemoteConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub const ENDPOINT_VAR: &str = "SHIFT_CHECKOUT_ENDPOINT";
pub const TIMEOUT_VAR: &str = "SHIFT_CHECKOUT_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {key} value '{value}': expected a whole number of seconds above zero")]
    InvalidTimeout { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub remote: RemoteSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSection {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Bare level or `EnvFilter` directive.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Parse TOML text. `origin` only labels errors.
    pub fn from_toml_str(
        text: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.check_timeout()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Overlay the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`; blank values are ignored.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            self.remote.endpoint = Some(endpoint.trim().to_string());
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            self.remote.timeout_secs = Some(parse_timeout(TIMEOUT_VAR, &raw)?);
        }
        Ok(())
    }

    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            endpoint: self.remote.endpoint.clone(),
            timeout: self
                .remote
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        }
    }

    fn check_timeout(&self) -> Result<(), ConfigError> {
        match self.remote.timeout_secs {
            Some(0) => Err(ConfigError::InvalidTimeout {
                key: "remote.timeout_secs".to_string(),
                value: "0".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Parse a positive number of seconds.
pub fn parse_timeout(
    key: &str,
    raw: &str,
) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
