//! Provider presets for the chains in the network table.

use super::ProviderConfig;

/// Ethereum Mainnet provider configuration
pub fn ethereum_mainnet() -> ProviderConfig {
    ProviderConfig::new("https://eth.llamarpc.com").with_timeout(30)
}

/// Ethereum Sepolia testnet provider configuration
pub fn ethereum_sepolia() -> ProviderConfig {
    ProviderConfig::new("https://rpc.sepolia.org").with_timeout(30)
}

/// Base Mainnet provider configuration
pub fn base_mainnet() -> ProviderConfig {
    ProviderConfig::new("https://mainnet.base.org").with_timeout(30)
}

/// Base Sepolia testnet provider configuration
pub fn base_sepolia() -> ProviderConfig {
    ProviderConfig::new("https://sepolia.base.org").with_timeout(30)
}

/// Lisk Mainnet provider configuration
pub fn lisk_mainnet() -> ProviderConfig {
    ProviderConfig::new("https://rpc.api.lisk.com").with_timeout(30)
}

/// Lisk Sepolia testnet provider configuration
pub fn lisk_sepolia() -> ProviderConfig {
    ProviderConfig::new("https://rpc.sepolia-api.lisk.com").with_timeout(30)
}

/// Swisstronik testnet provider configuration
pub fn swisstronik_testnet() -> ProviderConfig {
    ProviderConfig::new("https://json-rpc.testnet.swisstronik.com").with_timeout(30)
}

/// Local development node (anvil, hardhat)
pub fn localhost() -> ProviderConfig {
    ProviderConfig::default()
}

/// Preset for a chain id. Base Goerli is shut down and has none.
pub fn for_chain(chain_id: u64) -> Option<ProviderConfig> {
    match chain_id {
        1 => Some(ethereum_mainnet()),
        11155111 => Some(ethereum_sepolia()),
        8453 => Some(base_mainnet()),
        84532 => Some(base_sepolia()),
        1135 => Some(lisk_mainnet()),
        4202 => Some(lisk_sepolia()),
        1291 => Some(swisstronik_testnet()),
        _ => None,
    }
}
