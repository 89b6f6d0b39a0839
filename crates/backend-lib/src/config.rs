// ============================
// bankapi-backend/src/config.rs
// ============================
//! Configuration management.
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Prefix for environment overrides, e.g. `BANKAPI_BIND_ADDR`
pub const ENV_PREFIX: &str = "BANKAPI_";

/// Bare environment variable also accepted for the signing secret
pub const SECRET_ENV_VAR: &str = "JWT_SECRET";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// HMAC secret for bearer tokens
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Deadline applied to every request
    pub request_timeout_secs: u64,
    pub storage: StorageKind,
    /// Directory for the flat-file store
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    File,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            jwt_secret: None,
            token_ttl_secs: 60 * 60 * 24, // 24 hours
            request_timeout_secs: 10,
            storage: StorageKind::File,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("storage", &self.storage)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl Settings {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), AppError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => {},
            _ => {
                return Err(AppError::Config(format!(
                    "{SECRET_ENV_VAR} (or {ENV_PREFIX}JWT_SECRET) must be set"
                )))
            },
        }

        if self.token_ttl_secs == 0 {
            return Err(AppError::Config("token_ttl_secs must be positive".into()));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::Config("request_timeout_secs must be positive".into()));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// Load settings: defaults, then the TOML file, then `BANKAPI_*` variables,
/// then a bare `JWT_SECRET`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, AppError> {
    let path = path.unwrap_or_else(|| Path::new("config.toml"));

    let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Env::raw().only(&[SECRET_ENV_VAR]))
        .extract()
        .map_err(|e| AppError::Config(e.to_string()))?;

    settings.validate()?;
    Ok(settings)
}
