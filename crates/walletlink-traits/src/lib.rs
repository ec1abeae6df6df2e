//! # walletlink Traits
//!
//! The seams between the wallet session and the outside world.
//!
//! ## Core Traits
//!
//! - [`HostWallet`] - the injected wallet capability (account authorization,
//!   change notifications, provider handle construction)
//! - [`ProviderHandle`] - a handle bound to one chain, used for network-info and
//!   balance queries
//!
//! ## Example
//!
//! ```ignore
//! use walletlink_traits::prelude::*;
//!
//! async fn balance_of<P: ProviderHandle + ?Sized>(provider: &P, address: &str) -> WalletResult<String> {
//!     Ok(provider.get_balance(address).await?.to_decimal_string())
//! }
//! ```
//!
//! On `wasm32` targets the traits do not require `Send`/`Sync`, so browser
//! objects (`JsValue`) can implement them directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod events;
mod network;

pub use events::{HostEvent, HostEvents};
pub use network::{resolve_network_name, ChainSpec, Network, KNOWN_CHAINS, UNKNOWN_NETWORK};
pub use tokio::sync::broadcast;

/// Number of fractional digits of the native currency on every supported chain
pub const NATIVE_DECIMALS: u8 = 18;

/// `Send` on native targets, nothing on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + ?Sized> MaybeSend for T {}

/// `Send` on native targets, nothing on `wasm32`.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSend for T {}

/// `Send + Sync` on native targets, nothing on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

/// `Send + Sync` on native targets, nothing on `wasm32`.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

/// A base-unit amount with its number of fractional digits.
///
/// Conversion to a decimal string is exact: no floating point is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// The value in the smallest unit of the currency (wei for ETH)
    pub value: u128,
    /// Number of decimal places for the currency
    pub decimals: u8,
}

impl Amount {
    /// Creates a new Amount from the smallest unit value
    pub fn from_smallest_unit(value: u128, decimals: u8) -> Self {
        Self { value, decimals }
    }

    /// Creates an 18-decimal native currency amount from wei
    pub fn native(wei: u128) -> Self {
        Self::from_smallest_unit(wei, NATIVE_DECIMALS)
    }

    /// Returns the value in the smallest unit
    pub fn smallest_unit(&self) -> u128 {
        self.value
    }

    /// Renders the amount as a decimal string.
    ///
    /// Trailing fractional zeros are trimmed but at least one fractional digit
    /// is kept, so `2 * 10^18` wei renders as `"2.0"`.
    pub fn to_decimal_string(&self) -> String {
        let digits = self.value.to_string();
        let decimals = self.decimals as usize;
        let padded = if digits.len() <= decimals {
            format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac = frac_part.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };
        format!("{int_part}.{frac}")
    }

    /// Returns zero amount with the specified decimals
    pub fn zero(decimals: u8) -> Self {
        Self { value: 0, decimals }
    }

    /// Checks if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero(NATIVE_DECIMALS)
    }
}

/// Chain information reported by a provider handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Numeric chain identifier
    pub chain_id: u64,
}

impl ChainInfo {
    /// Creates chain info for the given id
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    /// Looks the chain up in the static table
    pub fn network(&self) -> Network {
        Network::from_chain_id(self.chain_id)
    }
}

/// Errors reported by a host wallet or a provider handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The user rejected the request (EIP-1193 code 4001)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The wallet or node answered with an error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// The request never produced an answer
    #[error("Transport error: {0}")]
    Transport(String),

    /// The answer could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The address could not be used for the query
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The capability vanished from the host
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),
}

/// Result type for host and provider operations
pub type WalletResult<T> = Result<T, WalletError>;

/// A handle bound to a single chain.
///
/// Handles are cheap to create; the session drops its handle whenever the
/// host reports a chain change and never queries the old one again.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ProviderHandle: MaybeSendSync {
    /// Returns the chain the handle is bound to
    async fn get_network(&self) -> WalletResult<ChainInfo>;

    /// Returns the base-unit balance of `address`
    async fn get_balance(&self, address: &str) -> WalletResult<Amount>;
}

/// The injected wallet capability of the host environment.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HostWallet: MaybeSendSync {
    /// Requests account authorization. May prompt the user.
    ///
    /// Returns the authorized accounts, primary account first.
    async fn request_accounts(&self) -> WalletResult<Vec<String>>;

    /// Subscribes to account and chain change notifications.
    ///
    /// Dropping the returned [`HostEvents`] unsubscribes.
    fn subscribe(&self) -> HostEvents;

    /// Builds a new provider handle bound to the current chain
    fn provider(&self) -> WalletResult<Arc<dyn ProviderHandle>>;

    /// Human readable name of the host, for logs
    fn name(&self) -> &str {
        "injected"
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        resolve_network_name, Amount, ChainInfo, HostEvent, HostEvents, HostWallet, Network,
        ProviderHandle, WalletError, WalletResult, NATIVE_DECIMALS,
    };
}
