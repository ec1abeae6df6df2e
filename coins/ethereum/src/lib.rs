//! # walletlink Ethereum
//!
//! Alloy-backed provider handle and Ethereum helpers for walletlink.
//!
//! This library uses the [alloy](https://github.com/alloy-rs/alloy) framework for Ethereum interactions.
//!
//! ## Quickstart Guide
//!
//! [AlloyProviderHandle] answers the session's network and balance queries
//! against any JSON-RPC endpoint.
//!
//! ```no_run
//! use walletlink_ethereum::prelude::*;
//!
//! # async fn ethereum() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = AlloyProviderHandle::new("https://eth.llamarpc.com")?;
//! let network = handle.get_network().await?;
//! println!("connected to {}", network.network().name);
//! # Ok(())
//! # }
//! ```
//!
//! ### Balance of an Address
//! [EthClient] exposes the underlying queries and keeps the full 256-bit range.
//! ```no_run
//! # use walletlink_ethereum::prelude::*;
//! # async fn ethereum() -> Result<(), walletlink_ethereum::Error> {
//! let address = EthClient::parse_address("0xFf7FD50BF684eb853787179cc9c784b55Ac68699")?;
//! let balance = EthClient::balance("https://eth.llamarpc.com", address).await?;
//! println!("balance: {} ({} wei)", balance, balance.wei());
//! # Ok(())
//! # }
//! ```
//!
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod address;
pub use address::{checksum_address, format_address, is_valid_address, EthereumFormat};
mod ethclient;
pub use ethclient::EthClient;
mod ethereum_amount;
pub use ethereum_amount::EthereumAmount;
mod error;
pub use error::Error;
mod provider;
pub use provider::AlloyProviderHandle;
pub use alloy;
pub mod prelude;

/// Re-export walletlink-traits for convenience
pub use walletlink_traits;
