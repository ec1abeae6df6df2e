//! Endpoint and HTTP client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ProviderError, Result};

/// Configuration for a provider endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// JSON-RPC URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional client side rate limit
    pub rate_limit: Option<RateLimitConfig>,
}

impl ProviderConfig {
    /// Creates a new provider configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 30,
            rate_limit: None,
        }
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enables client side rate limiting
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url).map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ProviderError::InvalidConfig("timeout must be non-zero".into()));
        }
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }
        Ok(())
    }

    /// HTTP client settings derived from this endpoint
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout_secs: self.timeout_secs,
            ..Default::default()
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("http://localhost:8545")
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
    /// Idle connection timeout
    pub pool_idle_timeout_secs: u64,
    /// Connection timeout
    pub connect_timeout_secs: u64,
    /// Request timeout
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Enable gzip compression
    pub gzip: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            pool_idle_timeout_secs: 90,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: format!("walletlink/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
        }
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: u32,
    /// Burst size (max requests in a burst)
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.requests_per_second == 0 || self.burst_size == 0 {
            return Err(ProviderError::InvalidConfig(
                "rate limit values must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
        }
    }
}
