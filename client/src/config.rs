//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AUTH_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_GEO_BASE_URL: &str = "https://apis.datos.gob.ar/georef/api";
pub const DATA_DIR_NAME: &str = "climaguard";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A base URL did not use an `http://` or `https://` scheme.
    #[error("invalid base URL in {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },

    /// No data directory was configured and the platform has none.
    #[error("no data directory available; set CLIMAGUARD_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub request: Option<Duration>,
    pub connect: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub auth_base_url: String,
    pub geo_base_url: String,
    pub data_dir: PathBuf,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CLIMAGUARD_AUTH_URL`: auth service base URL (default `http://127.0.0.1:3000`)
    /// - `CLIMAGUARD_GEO_URL`: geographic directory base URL (default georef API)
    /// - `CLIMAGUARD_DATA_DIR`: where the session marker lives (default platform data dir)
    /// - `CLIMAGUARD_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `CLIMAGUARD_CONNECT_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is malformed or no data directory can be found.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is malformed or no data directory can be found.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_base_url = parse_base_url("CLIMAGUARD_AUTH_URL", lookup("CLIMAGUARD_AUTH_URL"), DEFAULT_AUTH_BASE_URL)?;
        let geo_base_url = parse_base_url("CLIMAGUARD_GEO_URL", lookup("CLIMAGUARD_GEO_URL"), DEFAULT_GEO_BASE_URL)?;

        let data_dir = match lookup("CLIMAGUARD_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        let timeouts = HttpTimeouts {
            request: parse_secs(lookup("CLIMAGUARD_REQUEST_TIMEOUT_SECS").as_deref()),
            connect: parse_secs(lookup("CLIMAGUARD_CONNECT_TIMEOUT_SECS").as_deref()),
        };

        Ok(Self { auth_base_url, geo_base_url, data_dir, timeouts })
    }

    /// Override the auth base URL, applying the same validation as the env path.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an `http(s)://` URL.
    pub fn with_auth_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.auth_base_url = parse_base_url("--auth-url", Some(url.to_owned()), DEFAULT_AUTH_BASE_URL)?;
        Ok(self)
    }

    /// Override the geo base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an `http(s)://` URL.
    pub fn with_geo_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.geo_base_url = parse_base_url("--geo-url", Some(url.to_owned()), DEFAULT_GEO_BASE_URL)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(DATA_DIR_NAME))
}

fn parse_base_url(var: &'static str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    let value = raw
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned());
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl { var, value });
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn parse_secs(raw: Option<&str>) -> Option<Duration> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
