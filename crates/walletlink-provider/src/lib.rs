//! # walletlink Provider
//!
//! JSON-RPC plumbing for the walletlink session core. It talks to any
//! Ethereum-compatible node over HTTP.
//!
//! ## Features
//!
//! - [`RpcClient`] - pooled HTTP client with optional rate limiting
//! - [`RpcProviderHandle`] - `eth_chainId` / `eth_getBalance` provider handle
//! - [`RpcHost`] - node-backed host wallet with a polling change watcher
//! - [`presets`] - endpoints for the chains in the network table
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use walletlink_provider::{presets, RpcHost};
//!
//! let host = Arc::new(RpcHost::new(presets::base_mainnet())?);
//! let _watcher = host.spawn_watcher(std::time::Duration::from_secs(4));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;
use walletlink_traits::WalletError;

mod client;
mod config;
mod handle;
mod host;
pub mod presets;

pub use client::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcClient};
pub use config::{HttpClientConfig, ProviderConfig, RateLimitConfig};
pub use handle::{parse_chain_id, parse_quantity, RpcProviderHandle};
pub use host::{rpc_handle_factory, HandleFactory, RpcHost, WatcherGuard};

/// EIP-1193 code for a request the user rejected
pub const USER_REJECTED: i64 = 4001;

/// JSON-RPC code for an unknown method
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Provider-related errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RPC error response
    #[error("RPC error: code={code}, message={message}")]
    RpcError {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Response carried neither a result nor an error
    #[error("No result in response to {0}")]
    MissingResult(String),

    /// Hex quantity could not be parsed
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RpcError { code, message } if code == USER_REJECTED => {
                WalletError::Rejected(message)
            }
            ProviderError::RpcError { code, message } => WalletError::Rpc { code, message },
            ProviderError::InvalidUrl(_)
            | ProviderError::InvalidConfig(_)
            | ProviderError::ConnectionFailed(_) => WalletError::Unavailable(err.to_string()),
            ProviderError::Http(_) => WalletError::Transport(err.to_string()),
            ProviderError::Json(_)
            | ProviderError::MissingResult(_)
            | ProviderError::InvalidQuantity(_) => WalletError::InvalidResponse(err.to_string()),
        }
    }
}
