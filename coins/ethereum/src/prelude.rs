//! This prelude module simplifies importing many useful items from the walletlink_ethereum crate using a glob import.
//!
//! To use this prelude, add the following to your code:
//! ```
//! use walletlink_ethereum::prelude::*;
//! ```

pub use crate::{
    checksum_address, is_valid_address, AlloyProviderHandle, EthClient, EthereumAmount,
    EthereumFormat,
};

pub use alloy::primitives::{Address, U256};
pub use walletlink_traits::ProviderHandle;
