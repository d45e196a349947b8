//! Gateway configuration.
//!
//! Resolved once at startup and handed to `HttpGateway::builder`. The gateway itself
//! never reads the process environment.

use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

pub const API_BASE_URL_VAR: &str = "API_BASE_URL";
pub const API_TIMEOUT_VAR: &str = "API_TIMEOUT_SECS";
pub const API_MAX_UPLOAD_VAR: &str = "API_MAX_UPLOAD_MB";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    base_url: Url,
    timeout: Duration,
    max_upload_bytes: u64,
}

impl GatewayConfig {
    /// Validates `base_url`: it must parse and use `http` or `https`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
            value: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: trimmed.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: parsed,
            timeout: DEFAULT_TIMEOUT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Reads `API_BASE_URL` (required), `API_TIMEOUT_SECS` and `API_MAX_UPLOAD_MB`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`GatewayConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_BASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing(API_BASE_URL_VAR.to_string()))?;
        let mut config = Self::new(&base_url)?;

        if let Some(raw) = lookup(API_TIMEOUT_VAR) {
            let secs = parse_number(API_TIMEOUT_VAR, &raw)?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(API_MAX_UPLOAD_VAR) {
            let megabytes = parse_number(API_MAX_UPLOAD_VAR, &raw)?;
            config = config.with_max_upload_bytes(megabytes * 1024 * 1024);
        }

        Ok(config)
    }

    /// Same as [`GatewayConfig::from_lookup`], except that `base_url` (typically a
    /// command-line flag) wins over the looked-up `API_BASE_URL` when given.
    pub fn from_lookup_with_base_url<F>(base_url: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|var| match (var, base_url) {
            (API_BASE_URL_VAR, Some(url)) => Some(url.to_string()),
            _ => lookup(var),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }
}

fn parse_number(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        value: raw.to_string(),
    })
}
