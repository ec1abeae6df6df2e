//! Provider handle over an alloy HTTP provider.

use async_trait::async_trait;
use walletlink_traits::{Amount, ChainInfo, ProviderHandle, WalletResult};

use crate::{EthClient, Error};

/// Provider handle that answers network and balance queries through alloy
#[derive(Debug, Clone)]
pub struct AlloyProviderHandle {
    rpc_url: String,
}

impl AlloyProviderHandle {
    /// Creates a handle for `rpc_url`. The URL is checked, nothing is sent.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, Error> {
        let rpc_url = rpc_url.into();
        EthClient::parse_url(&rpc_url)?;
        Ok(Self { rpc_url })
    }

    /// RPC endpoint URL
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl ProviderHandle for AlloyProviderHandle {
    async fn get_network(&self) -> WalletResult<ChainInfo> {
        let chain_id = EthClient::chain_id(&self.rpc_url).await?;
        Ok(ChainInfo::new(chain_id))
    }

    async fn get_balance(&self, address: &str) -> WalletResult<Amount> {
        let address = EthClient::parse_address(address)?;
        let balance = EthClient::balance(&self.rpc_url, address).await?;
        Ok(Amount::try_from(balance)?)
    }
}
