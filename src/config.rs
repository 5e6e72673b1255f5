//! Configuration types.

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default address the onboarding service listens on.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default idle time before a hosted session is evicted.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the HR REST backend, without trailing slash.
    pub api_base_url: String,
    /// Bearer token for the HR backend, if it requires one.
    pub api_token: Option<SecretString>,
    /// Where the onboarding REST surface listens.
    pub bind: SocketAddr,
    /// How long an untouched session is kept.
    pub session_ttl: Duration,
}

impl ServiceConfig {
    /// Build config from the process environment.
    ///
    /// `HR_API_BASE_URL` is required; `HR_API_TOKEN`, `HR_ONBOARD_BIND` and
    /// `HR_ONBOARD_SESSION_TTL_SECS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("HR_API_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("HR_API_BASE_URL".to_string()))?;

        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "HR_API_BASE_URL".to_string(),
                message: format!("expected an http(s) URL, got {api_base_url}"),
            });
        }

        let api_token = lookup("HR_API_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        let bind_raw = lookup("HR_ONBOARD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "HR_ONBOARD_BIND".to_string(),
                message: format!("{bind_raw}: {e}"),
            })?;

        let session_ttl = match lookup("HR_ONBOARD_SESSION_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "HR_ONBOARD_SESSION_TTL_SECS".to_string(),
                    message: format!("expected a positive number of seconds, got {raw}"),
                })?,
            None => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            api_base_url,
            api_token,
            bind,
            session_ttl,
        })
    }
}
