//! Static chain table.

use serde::{Deserialize, Serialize};

/// Display name used for any chain id missing from [`KNOWN_CHAINS`]
pub const UNKNOWN_NETWORK: &str = "Unknown Network";

/// One entry of the static chain table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSpec {
    /// Numeric chain identifier
    pub chain_id: u64,
    /// Display name
    pub name: &'static str,
    /// Whether the chain is a test network
    pub is_testnet: bool,
    /// Symbol of the native currency
    pub native_symbol: &'static str,
}

/// Chains with a known display name
pub const KNOWN_CHAINS: &[ChainSpec] = &[
    ChainSpec { chain_id: 1, name: "Ethereum Mainnet", is_testnet: false, native_symbol: "ETH" },
    ChainSpec { chain_id: 11155111, name: "Sepolia Test Network", is_testnet: true, native_symbol: "ETH" },
    ChainSpec { chain_id: 84531, name: "Base Goerli", is_testnet: true, native_symbol: "ETH" },
    ChainSpec { chain_id: 4202, name: "Lisk Sepolia", is_testnet: true, native_symbol: "ETH" },
    ChainSpec { chain_id: 1135, name: "Lisk Mainnet", is_testnet: false, native_symbol: "ETH" },
    ChainSpec { chain_id: 8453, name: "Base Mainnet", is_testnet: false, native_symbol: "ETH" },
    ChainSpec { chain_id: 84532, name: "Base Sepolia Testnet", is_testnet: true, native_symbol: "ETH" },
    ChainSpec { chain_id: 1291, name: "Swisstronik Testnet", is_testnet: true, native_symbol: "SWTR" },
];

/// Maps a chain id to its display name, [`UNKNOWN_NETWORK`] when absent.
pub fn resolve_network_name(chain_id: u64) -> &'static str {
    lookup(chain_id).map_or(UNKNOWN_NETWORK, |spec| spec.name)
}

fn lookup(chain_id: u64) -> Option<&'static ChainSpec> {
    KNOWN_CHAINS.iter().find(|spec| spec.chain_id == chain_id)
}

/// Network information as shown by the session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    /// Network name
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// Whether this is a testnet
    pub is_testnet: bool,
    /// Symbol of the native currency
    pub native_symbol: String,
}

impl Network {
    /// Builds the network for a chain id from the static table.
    ///
    /// Unknown ids keep their id, use [`UNKNOWN_NETWORK`] and are assumed to
    /// be ETH-denominated mainnets.
    pub fn from_chain_id(chain_id: u64) -> Self {
        match lookup(chain_id) {
            Some(spec) => Self {
                name: spec.name.to_string(),
                chain_id,
                is_testnet: spec.is_testnet,
                native_symbol: spec.native_symbol.to_string(),
            },
            None => Self {
                name: UNKNOWN_NETWORK.to_string(),
                chain_id,
                is_testnet: false,
                native_symbol: "ETH".to_string(),
            },
        }
    }
}
