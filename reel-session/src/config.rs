//! Session configuration
//!
//! Defines the tunables of a watch session: where the backend lives, how
//! often it is polled and how hard it may be hit.

use anyhow::Context;
use reel_client::BackendClient;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Session configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://localhost:8000")
    pub backend_url: String,

    /// How often the job list is refreshed
    pub poll_interval: Duration,

    /// Upper bound for any single request to the backend
    pub request_timeout: Duration,

    /// Maximum number of artifact fetches running at the same time
    pub max_concurrent_fetches: usize,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            max_concurrent_fetches: 8,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max_concurrent_fetches: usize) -> Self {
        self.max_concurrent_fetches = max_concurrent_fetches;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.is_empty() {
            anyhow::bail!("backend_url cannot be empty");
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            anyhow::bail!("backend_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.max_concurrent_fetches == 0 {
            anyhow::bail!("max_concurrent_fetches must be greater than 0");
        }

        if self.max_concurrent_fetches > Semaphore::MAX_PERMITS {
            anyhow::bail!(
                "max_concurrent_fetches must be at most {}",
                Semaphore::MAX_PERMITS
            );
        }

        Ok(())
    }

    /// Builds a backend client honoring the request timeout
    pub fn connect(&self) -> anyhow::Result<BackendClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(BackendClient::with_client(
            self.backend_url.clone(),
            http_client,
        ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrent_fetches, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.backend_url = String::new();
        assert!(config.validate().is_err());

        config.backend_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.backend_url = "https://video.internal".to_string();
        assert!(config.validate().is_ok());

        let config = Config::default().with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = Config::default().with_max_concurrent_fetches(0);
        assert!(config.validate().is_err());

        let config = Config::default().with_max_concurrent_fetches(usize::MAX);
        assert!(config.validate().is_err());

        let config = Config::default().with_max_concurrent_fetches(Semaphore::MAX_PERMITS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connect_uses_backend_url() {
        let client = Config::new("http://localhost:9000/").connect().unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
