use std::str::FromStr;

use crate::Error;
use crate::EthereumAmount;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;

/// A blockchain connector for Ethereum using Alloy.
pub struct EthClient {}

impl EthClient {
    /// Parses an endpoint URL
    pub fn parse_url(rpc_url: &str) -> Result<Url, Error> {
        rpc_url
            .parse()
            .map_err(|e| Error::InvalidUrl(format!("{rpc_url}: {e}")))
    }

    /// Parses a hex address in either case
    pub fn parse_address(address: &str) -> Result<Address, Error> {
        Address::from_str(address).map_err(|_| Error::InvalidAddress(address.to_string()))
    }

    /// Returns the chain id of the current network.
    pub async fn chain_id(rpc_url: &str) -> Result<u64, Error> {
        let provider = ProviderBuilder::new().connect_http(Self::parse_url(rpc_url)?);
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get chain ID: {e}")))?;
        Ok(chain_id)
    }

    /// Returns the latest balance of an address as an [EthereumAmount].
    pub async fn balance(rpc_url: &str, address: Address) -> Result<EthereumAmount, Error> {
        let provider = ProviderBuilder::new().connect_http(Self::parse_url(rpc_url)?);
        let balance = provider
            .get_balance(address)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get balance: {e}")))?;
        Ok(EthereumAmount { wei: balance })
    }
}

#[cfg(test)]
fn anvil_available() -> bool {
    std::process::Command::new("anvil")
        .arg("--version")
        .output()
        .is_ok()
}
