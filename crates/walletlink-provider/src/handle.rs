//! Provider handle backed by a JSON-RPC node.

use std::sync::Arc;

use async_trait::async_trait;
use walletlink_traits::{Amount, ChainInfo, ProviderHandle, WalletResult};

use crate::client::RpcClient;
use crate::config::ProviderConfig;
use crate::{ProviderError, Result};

/// Parses a JSON-RPC hex quantity: `0x` followed by at least one hex digit
pub fn parse_quantity(value: &str) -> Result<u128> {
    let invalid = || ProviderError::InvalidQuantity(value.to_string());
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u128::from_str_radix(digits, 16).map_err(|_| invalid())
}

/// Parses a JSON-RPC hex chain id
pub fn parse_chain_id(value: &str) -> Result<u64> {
    let quantity = parse_quantity(value)?;
    u64::try_from(quantity).map_err(|_| ProviderError::InvalidQuantity(value.to_string()))
}

/// Provider handle that issues `eth_chainId` and `eth_getBalance` to one
/// endpoint
#[derive(Debug, Clone)]
pub struct RpcProviderHandle {
    client: Arc<RpcClient>,
    url: String,
}

impl RpcProviderHandle {
    /// Creates a handle with its own client
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = RpcClient::with_config(config.http_config(), config.rate_limit)?;
        Ok(Self::with_client(Arc::new(client), config.url.clone()))
    }

    /// Creates a handle sharing an existing client
    pub fn with_client(client: Arc<RpcClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Queries the chain id
    pub async fn chain_id(&self) -> Result<u64> {
        let raw: String = self
            .client
            .rpc_call(&self.url, "eth_chainId", Vec::<()>::new())
            .await?;
        parse_chain_id(&raw)
    }

    /// Queries the latest balance of `address` in wei
    pub async fn balance_wei(&self, address: &str) -> Result<u128> {
        let raw: String = self
            .client
            .rpc_call(&self.url, "eth_getBalance", (address, "latest"))
            .await?;
        parse_quantity(&raw)
    }
}

#[async_trait]
impl ProviderHandle for RpcProviderHandle {
    async fn get_network(&self) -> WalletResult<ChainInfo> {
        Ok(ChainInfo::new(self.chain_id().await?))
    }

    async fn get_balance(&self, address: &str) -> WalletResult<Amount> {
        Ok(Amount::native(self.balance_wei(address).await?))
    }
}
