//! # walletlink Error
//!
//! Error taxonomy shared by every walletlink crate.
//!
//! The wallet session distinguishes three failure kinds:
//!
//! - [`WalletlinkError::ProviderUnavailable`] - no injected wallet capability exists
//! - [`WalletlinkError::ConnectionDenied`] - the user or the wallet refused authorization
//! - [`WalletlinkError::QueryFailed`] - a network-info or balance query failed
//!
//! The first two are surfaced to the user as notices. `QueryFailed` is recovered
//! by the session itself and only kept for diagnostics, see [`Severity`].
//!
//! ## Example
//!
//! ```
//! use walletlink_error::{Operation, Severity, WalletlinkError};
//!
//! let err = WalletlinkError::from_host(Operation::RequestAccounts, "User rejected the request");
//! assert_eq!(err.severity(), Severity::Notice);
//!
//! let err = WalletlinkError::from_host(Operation::GetBalance, "connection reset");
//! assert_eq!(err.severity(), Severity::Diagnostic);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fmt;
use thiserror::Error;

/// The host interaction an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Account authorization request (may prompt the user)
    RequestAccounts,
    /// Chain information lookup through a provider handle
    GetNetwork,
    /// Balance lookup through a provider handle
    GetBalance,
    /// Provider handle construction
    AcquireProvider,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::RequestAccounts => "request_accounts",
            Operation::GetNetwork => "get_network",
            Operation::GetBalance => "get_balance",
            Operation::AcquireProvider => "acquire_provider",
        };
        f.write_str(name)
    }
}

/// The main error type for wallet session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalletlinkError {
    /// The host environment exposes no wallet capability
    #[error("No injected wallet provider found. Install a wallet extension and retry.")]
    ProviderUnavailable,

    /// Account authorization was rejected by the user or failed in the wallet
    #[error("Wallet connection denied: {reason}")]
    ConnectionDenied {
        /// Reason reported by the wallet
        reason: String,
    },

    /// A network or balance query failed
    #[error("Query {operation} failed: {reason}")]
    QueryFailed {
        /// The failing operation
        operation: Operation,
        /// Reason reported by the provider
        reason: String,
    },
}

/// Convenient Result type using WalletlinkError
pub type Result<T> = std::result::Result<T, WalletlinkError>;

/// How an error is propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Shown to the user so they can retry or install a wallet
    Notice,
    /// Recovered locally, recorded for diagnostics only
    Diagnostic,
}

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    /// No wallet capability
    ProviderUnavailable = 1001,
    /// Authorization rejected
    ConnectionDenied = 1002,
    /// Chain information query failed
    NetworkQueryFailed = 2001,
    /// Balance query failed
    BalanceQueryFailed = 2002,
    /// Provider handle could not be built
    ProviderAcquireFailed = 2003,
}

impl WalletlinkError {
    /// Classifies an error reported by the host for the given operation.
    ///
    /// Failures of the authorization request become `ConnectionDenied`,
    /// everything else is a `QueryFailed`.
    pub fn from_host(operation: Operation, err: impl fmt::Display) -> Self {
        match operation {
            Operation::RequestAccounts => WalletlinkError::ConnectionDenied {
                reason: err.to_string(),
            },
            _ => WalletlinkError::QueryFailed {
                operation,
                reason: err.to_string(),
            },
        }
    }

    /// Shorthand for a `ConnectionDenied` with the given reason
    pub fn denied(reason: impl Into<String>) -> Self {
        WalletlinkError::ConnectionDenied {
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            WalletlinkError::ProviderUnavailable => ErrorCode::ProviderUnavailable,
            WalletlinkError::ConnectionDenied { .. } => ErrorCode::ConnectionDenied,
            WalletlinkError::QueryFailed { operation, .. } => match operation {
                Operation::GetNetwork => ErrorCode::NetworkQueryFailed,
                Operation::AcquireProvider => ErrorCode::ProviderAcquireFailed,
                Operation::GetBalance | Operation::RequestAccounts => ErrorCode::BalanceQueryFailed,
            },
        }
    }

    /// Returns how this error should be propagated
    pub fn severity(&self) -> Severity {
        match self {
            WalletlinkError::ProviderUnavailable | WalletlinkError::ConnectionDenied { .. } => {
                Severity::Notice
            }
            WalletlinkError::QueryFailed { .. } => Severity::Diagnostic,
        }
    }

    /// Returns true if the UI should show this error to the user
    pub fn is_user_visible(&self) -> bool {
        self.severity() == Severity::Notice
    }
}
