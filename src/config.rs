use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the ads backend.
///
/// Passed explicitly into the backend client. The CLI builds it from the
/// environment with [`Config::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the backend, without a trailing slash (e.g. "http://localhost:5000")
    pub backend_url: String,
    /// Per-request timeout for the HTTP client
    pub timeout: Duration,
}

impl Config {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `BACKEND_URL` (required) and `BACKEND_TIMEOUT_SECS` (optional).
    pub fn from_env() -> Result<Self> {
        let backend_url =
            std::env::var("BACKEND_URL").context("BACKEND_URL must be provided")?;

        let timeout_secs = match std::env::var("BACKEND_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("BACKEND_TIMEOUT_SECS is not a number: {:?}", raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(backend_url).with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Collection endpoint, `POST` target
    pub fn ads_url(&self) -> String {
        format!("{}/api/ads", self.backend_url)
    }

    /// Single-record endpoint, `PUT` target
    pub fn ad_url(&self, id: &str) -> String {
        format!("{}/api/ads/{}", self.backend_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::new("http://localhost:5000/");
        assert_eq!(config.ads_url(), "http://localhost:5000/api/ads");
        assert_eq!(config.ad_url("1"), "http://localhost:5000/api/ads/1");
    }

    #[test]
    fn default_timeout() {
        assert_eq!(Config::new("http://x").timeout, Duration::from_secs(30));
    }
}
