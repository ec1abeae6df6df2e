//! JSON-RPC over HTTP.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::{HttpClientConfig, RateLimitConfig};
use crate::{ProviderError, Result};

/// RPC request payload
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<T: Serialize> {
    /// JSON-RPC version
    pub jsonrpc: &'static str,
    /// Method name
    pub method: String,
    /// Parameters
    pub params: T,
    /// Request ID
    pub id: u64,
}

impl<T: Serialize> JsonRpcRequest<T> {
    /// Creates a new JSON-RPC request
    pub fn new(method: impl Into<String>, params: T, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id,
        }
    }
}

/// RPC response payload
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<T> {
    /// JSON-RPC version
    pub jsonrpc: String,
    /// Response ID
    pub id: u64,
    /// Result (if successful)
    pub result: Option<T>,
    /// Error (if failed)
    pub error: Option<JsonRpcError>,
}

/// RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Additional data
    pub data: Option<serde_json::Value>,
}

/// HTTP client with connection pooling and rate limiting
pub struct RpcClient {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Creates a new RPC client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default(), None)
    }

    /// Creates a new RPC client with custom configuration
    pub fn with_config(
        http_config: HttpClientConfig,
        rate_limit: Option<RateLimitConfig>,
    ) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(http_config.pool_idle_timeout_secs))
            .connect_timeout(Duration::from_secs(http_config.connect_timeout_secs))
            .timeout(Duration::from_secs(http_config.request_timeout_secs))
            .user_agent(&http_config.user_agent)
            .gzip(http_config.gzip)
            .build()
            .map_err(|e: reqwest::Error| ProviderError::ConnectionFailed(e.to_string()))?;

        let rate_limiter = match rate_limit {
            Some(config) => {
                let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
                    ProviderError::InvalidConfig("requests_per_second must be non-zero".into())
                })?;
                let burst = NonZeroU32::new(config.burst_size).ok_or_else(|| {
                    ProviderError::InvalidConfig("burst_size must be non-zero".into())
                })?;
                Some(RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst)))
            }
            None => None,
        };

        Ok(Self {
            client,
            rate_limiter,
            request_id: AtomicU64::new(1),
        })
    }

    /// Makes a JSON-RPC request
    pub async fn rpc_call<P, R>(&self, url: &str, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest::new(method, params, id);
        tracing::trace!(method, id, "rpc request");

        let response = self.client.post(url).json(&request).send().await?;
        let rpc_response: JsonRpcResponse<R> = response.json().await?;

        if let Some(error) = rpc_response.error {
            tracing::debug!(method, code = error.code, message = %error.message, "rpc error");
            return Err(ProviderError::RpcError {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| ProviderError::MissingResult(method.to_string()))
    }

    /// Returns the number of requests made
    pub fn request_count(&self) -> u64 {
        self.request_id.load(Ordering::SeqCst) - 1
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("request_count", &self.request_count())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish()
    }
}
