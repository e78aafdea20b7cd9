//! Application settings loading from config.toml and environment variables.
//!
//! Non-secret settings (bind address, session lifetime) live in `config.toml`.
//! Secrets and deployment-specific values come from the environment:
//! `DATABASE_URL`, and `ADMIN_EMAIL`/`ADMIN_PASSWORD` for the bootstrap
//! admin account seeded on first start.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings parsed from the config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Admin session settings
    #[serde(default)]
    pub auth: AuthSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the API listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Admin authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// How long a sign-in session stays valid, in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

const fn default_session_ttl_hours() -> i64 {
    24
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

impl Settings {
    /// Session lifetime in seconds, as used for session expiry arithmetic.
    #[must_use]
    pub const fn session_ttl_secs(&self) -> i64 {
        self.auth.session_ttl_hours * 3600
    }
}

/// Loads settings from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
/// A missing file is not an error; defaults apply.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("no config file at {}, using defaults", path.display());
        return Ok(Settings {
            server: ServerSettings::default(),
            auth: AuthSettings::default(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_settings() -> Result<Settings> {
    load_settings("config.toml")
}

/// Bootstrap admin credentials read from `ADMIN_EMAIL` and `ADMIN_PASSWORD`.
///
/// Returns `None` when either variable is unset; in that case no admin is
/// seeded and sign-in is only possible with previously created accounts.
#[must_use]
pub fn bootstrap_admin_credentials() -> Option<(String, String)> {
    match (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
            Some((email, password))
        }
        _ => None,
    }
}
