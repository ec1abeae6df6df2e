//! # walletlink Testing Infrastructure
//!
//! Testing utilities for the walletlink session core:
//! - Scriptable host wallet and provider handles ([`MockHost`], [`MockProvider`])
//! - Gates for holding queries in flight ([`Gate`])
//! - Edge case addresses, amounts and chain ids
//! - Property-based testing strategies
//!
//! ## Usage
//!
//! ```rust,ignore
//! use walletlink_testing::*;
//!
//! let host = MockHost::new()
//!     .with_accounts(["0xABC"])
//!     .with_balance("0xABC", EdgeCaseAmounts::ONE_ETHER)
//!     .shared();
//! let session = WalletSession::with_host(host.clone());
//!
//! proptest! {
//!     #[test]
//!     fn test_any_event_sequence(events in host_event_sequence()) {
//!         // ...
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proptest::prelude::*;
use walletlink_traits::{HostEvent, KNOWN_CHAINS};

mod mock;

pub use mock::{Gate, MockHost, MockProvider, ProviderCall};

// ============================================================================
// Edge Case Addresses
// ============================================================================

/// Edge case addresses for testing
pub struct EdgeCaseAddresses;

impl EdgeCaseAddresses {
    /// Valid checksummed Ethereum address
    pub const ETH_VALID: &'static str = "0x742d35Cc6634C0532925a3b844Bc9e7595f5fFb9";

    /// Another valid checksummed Ethereum address
    pub const ETH_OTHER: &'static str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    /// Ethereum zero address
    pub const ETH_ZERO: &'static str = "0x0000000000000000000000000000000000000000";

    /// Ethereum max address
    pub const ETH_MAX: &'static str = "0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF";

    /// Addresses a node rejects. The session only checks for presence, so
    /// apart from the empty string these reach the provider.
    pub fn invalid_ethereum() -> Vec<&'static str> {
        vec![
            "",
            "0x",
            "0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG", // Invalid hex
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5",     // Too short
            "742d35Cc6634C0532925a3b844Bc9e7595f5fFb9",   // Missing 0x
        ]
    }
}

// ============================================================================
// Edge Case Amounts
// ============================================================================

/// Edge case wei amounts for testing decimal conversion
pub struct EdgeCaseAmounts;

impl EdgeCaseAmounts {
    /// Zero amount
    pub const ZERO: u128 = 0;

    /// One wei
    pub const ONE_WEI: u128 = 1;

    /// One ether in wei
    pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    /// Two ether in wei
    pub const TWO_ETHER: u128 = 2_000_000_000_000_000_000;

    /// Largest amount representable at the trait seam
    pub const MAX: u128 = u128::MAX;

    /// Amounts with their expected decimal rendering
    pub fn decimal_cases() -> Vec<(u128, &'static str)> {
        vec![
            (Self::ZERO, "0.0"),
            (Self::ONE_WEI, "0.000000000000000001"),
            (1_000_000_000, "0.000000001"),
            (100_000_000_000_000_000, "0.1"),
            (Self::ONE_ETHER, "1.0"),
            (1_500_000_000_000_000_000, "1.5"),
            (Self::TWO_ETHER, "2.0"),
            (1_000_000_000_000_000_000_000_000, "1000000.0"),
            (Self::MAX, "340282366920938463463.374607431768211455"),
        ]
    }
}

// ============================================================================
// Edge Case Chains
// ============================================================================

/// Edge case chain ids
pub struct EdgeCaseChains;

impl EdgeCaseChains {
    /// Every chain id with a known name
    pub fn known() -> Vec<u64> {
        KNOWN_CHAINS.iter().map(|spec| spec.chain_id).collect()
    }

    /// Chain ids without a known name
    pub fn unknown() -> Vec<u64> {
        vec![0, 2, 5, 137, 31337, 999_999, u64::MAX]
    }
}

// ============================================================================
// Property-Based Testing Strategies
// ============================================================================

/// Generates well-formed lowercase Ethereum addresses
pub fn eth_address() -> impl Strategy<Value = String> {
    prop::array::uniform20(any::<u8>()).prop_map(|bytes| format!("0x{}", hex::encode(bytes)))
}

/// Generates wei amounts across the whole range
pub fn wei_amount() -> impl Strategy<Value = u128> {
    prop_oneof![
        Just(0u128),
        0u128..=EdgeCaseAmounts::ONE_ETHER,
        any::<u128>(),
    ]
}

/// Generates chain ids, biased towards the known ones
pub fn chain_id() -> impl Strategy<Value = u64> {
    prop_oneof![
        3 => prop::sample::select(EdgeCaseChains::known()),
        1 => any::<u64>(),
    ]
}

/// Generates a host notification from a small pool of accounts
pub fn host_event() -> impl Strategy<Value = HostEvent> {
    let accounts = prop::sample::select(vec![
        EdgeCaseAddresses::ETH_VALID,
        EdgeCaseAddresses::ETH_OTHER,
        EdgeCaseAddresses::ETH_ZERO,
    ]);
    prop_oneof![
        prop::collection::vec(accounts, 0..3).prop_map(|accounts| {
            HostEvent::AccountsChanged(accounts.into_iter().map(String::from).collect())
        }),
        prop::option::of(chain_id()).prop_map(HostEvent::ChainChanged),
    ]
}

/// Generates sequences of host notifications
pub fn host_event_sequence() -> impl Strategy<Value = Vec<HostEvent>> {
    prop::collection::vec(host_event(), 0..16)
}
