//! Observable session state.

use serde::{Deserialize, Serialize};
use walletlink_error::WalletlinkError;
use walletlink_traits::Network;

/// Connection status of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// No account is authorized
    #[default]
    Disconnected,
    /// An account is authorized and set as the session address
    Connected,
}

/// Connection state of the wallet session.
///
/// `status` is `Connected` exactly when `address` is present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Connection status
    pub status: ConnectionStatus,
    /// Primary authorized account
    pub address: Option<String>,
    /// Display name of the current network
    pub network: Option<String>,
    /// Chain id the network name was resolved from
    pub chain_id: Option<u64>,
    /// Balance of `address` as a decimal string
    pub connected_balance: Option<String>,
}

impl Session {
    /// Returns true if an account is connected
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Abbreviated address for display, e.g. `0x1234...cdef`.
    ///
    /// Short or non-ASCII addresses are returned unchanged.
    pub fn short_address(&self) -> Option<String> {
        self.address.as_deref().map(|address| {
            if address.len() > 10 && address.is_ascii() {
                format!("{}...{}", &address[..6], &address[address.len() - 4..])
            } else {
                address.to_string()
            }
        })
    }

    /// Symbol of the native currency of the current chain, `ETH` when unknown
    pub fn native_symbol(&self) -> String {
        self.chain_id
            .map(|id| Network::from_chain_id(id).native_symbol)
            .unwrap_or_else(|| "ETH".to_string())
    }

    /// Connected balance with its currency symbol, e.g. `1.5 ETH`
    pub fn balance_label(&self) -> Option<String> {
        self.connected_balance
            .as_ref()
            .map(|balance| format!("{} {}", balance, self.native_symbol()))
    }
}

/// Result of the most recent arbitrary-address lookup.
///
/// Independent of [`Session`]: connecting or disconnecting never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Address that was looked up
    pub queried_address: Option<String>,
    /// Balance of `queried_address` as a decimal string
    pub balance: Option<String>,
}

/// Why a balance fetch did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The session has no connected account
    NotConnected,
    /// No provider handle is available
    NoProvider,
    /// The lookup target was empty
    EmptyTarget,
}

/// What a balance fetch did.
///
/// Fetches never fail from the caller's point of view; this only reports
/// which path was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The balance was stored
    Updated(String),
    /// Nothing was queried
    Skipped(SkipReason),
    /// The query failed; the previous value was kept
    Failed(WalletlinkError),
    /// The query finished after a disconnect, account switch or chain change
    /// and its result was discarded
    Superseded,
}

impl FetchOutcome {
    /// Returns true if a new balance was stored
    pub fn is_updated(&self) -> bool {
        matches!(self, FetchOutcome::Updated(_))
    }

    /// The stored balance, if any
    pub fn balance(&self) -> Option<&str> {
        match self {
            FetchOutcome::Updated(balance) => Some(balance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(address: &str) -> Session {
        Session {
            status: ConnectionStatus::Connected,
            address: Some(address.to_string()),
            ..Session::default()
        }
    }

    #[test]
    fn test_default_session_is_disconnected() {
        let session = Session::default();
        assert_eq!(session.status, ConnectionStatus::Disconnected);
        assert!(!session.is_connected());
        assert!(session.address.is_none());
        assert!(session.network.is_none());
        assert!(session.connected_balance.is_none());
    }

    #[test]
    fn test_short_address() {
        let session = connected("0x1234567890abcdef1234567890abcdef12345678");
        assert_eq!(session.short_address().as_deref(), Some("0x1234...5678"));

        let session = connected("0xABC");
        assert_eq!(session.short_address().as_deref(), Some("0xABC"));

        assert_eq!(Session::default().short_address(), None);
    }

    #[test]
    fn test_balance_label() {
        let mut session = connected("0xABC");
        assert_eq!(session.balance_label(), None);

        session.connected_balance = Some("1.5".to_string());
        assert_eq!(session.balance_label().as_deref(), Some("1.5 ETH"));

        session.chain_id = Some(1291);
        assert_eq!(session.balance_label().as_deref(), Some("1.5 SWTR"));
    }

    #[test]
    fn test_fetch_outcome_helpers() {
        let outcome = FetchOutcome::Updated("2.0".to_string());
        assert!(outcome.is_updated());
        assert_eq!(outcome.balance(), Some("2.0"));

        let outcome = FetchOutcome::Skipped(SkipReason::NoProvider);
        assert!(!outcome.is_updated());
        assert_eq!(outcome.balance(), None);
    }
}
