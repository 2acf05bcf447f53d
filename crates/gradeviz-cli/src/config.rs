//! CLI configuration.
//!
//! Defaults come from code, overridden by environment variables (a `.env`
//! file is honored), overridden by CLI flags in `main`.

use std::time::Duration;

use anyhow::Result;
use gradeviz_client::{StatisticsClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

/// Application-wide configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Statistics endpoint base URL.
    pub endpoint: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("GRADEVIZ_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(secs) = std::env::var("GRADEVIZ_TIMEOUT_SECS") {
            config.timeout_secs = secs.parse().unwrap_or(config.timeout_secs);
        }

        Ok(config)
    }

    /// Build a client for this configuration.
    pub fn client(&self) -> StatisticsClient {
        StatisticsClient::with_timeout(&self.endpoint, Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_endpoint() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT.as_secs());
    }
}
