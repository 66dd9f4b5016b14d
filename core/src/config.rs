//! Client configuration and base URL resolution.
//!
//! The base URL follows a fixed override chain: an explicit argument wins,
//! then the `ALABAMA_API_BASE_URL` environment variable, then
//! `DEFAULT_BASE_URL`. The environment is read once, at construction.

use std::time::Duration;

/// Environment variable consulted when no explicit base URL is given.
pub const BASE_URL_ENV: &str = "ALABAMA_API_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings shared by every call made through one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Build a config, falling back to the environment and then the default
    /// for whichever of `base_url` / `timeout` is `None`.
    pub fn from_env(base_url: Option<&str>, timeout: Option<Duration>) -> Self {
        let env = std::env::var(BASE_URL_ENV).ok();
        let resolved = resolve_base_url(base_url, env.as_deref(), DEFAULT_BASE_URL);
        Self::new(&resolved, timeout.unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Pick the base URL from `explicit > env > default`. Empty values count as
/// absent. Trailing slashes are stripped from the result.
pub fn resolve_base_url(explicit: Option<&str>, env: Option<&str>, default: &str) -> String {
    [explicit, env]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}
