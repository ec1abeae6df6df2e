//! # walletlink - Wallet Session Core
//!
//! walletlink connects to a user's injected wallet, keeps the connected
//! account's address, network and balance in sync with the wallet, and looks
//! up the balance of arbitrary addresses.
//!
//! The heart of the crate is [`WalletSession`]. It owns the observable
//! [`Session`] and [`QueryResult`] and is the only component that talks to the
//! host wallet capability ([`traits::HostWallet`]).
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | Session core and traits only |
//! | `rpc` | JSON-RPC node backed host and provider handles |
//! | `ethereum` | alloy backed provider handles |
//! | `full` | All of the above |
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use walletlink::prelude::*;
//!
//! let session = Arc::new(WalletSession::with_host(host));
//! let _listener = session.spawn_listener();
//!
//! match session.connect().await {
//!     Ok(state) => println!("{:?} on {:?}", state.address, state.network),
//!     Err(err) if err.is_user_visible() => eprintln!("{err}"),
//!     Err(_) => {}
//! }
//!
//! session.fetch_balance_of("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").await;
//! println!("{:?}", session.query_result().balance);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod session;
mod state;

#[cfg(not(target_arch = "wasm32"))]
pub use session::ListenerGuard;
pub use session::WalletSession;
pub use state::{ConnectionStatus, FetchOutcome, QueryResult, Session, SkipReason};

// ============================================================================
// Core re-exports
// ============================================================================

pub use walletlink_error as error;
pub use walletlink_traits as traits;

pub use walletlink_error::{Operation, WalletlinkError};
pub use walletlink_traits::resolve_network_name;

// ============================================================================
// Backend re-exports
// ============================================================================

/// JSON-RPC node backend
#[cfg(feature = "rpc")]
#[cfg_attr(docsrs, doc(cfg(feature = "rpc")))]
pub mod rpc {
    pub use walletlink_provider::*;
}

/// alloy backend
#[cfg(feature = "ethereum")]
#[cfg_attr(docsrs, doc(cfg(feature = "ethereum")))]
pub mod ethereum {
    pub use walletlink_ethereum::*;
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConnectionStatus, FetchOutcome, QueryResult, Session, SkipReason, WalletSession,
    };
    pub use walletlink_error::{Operation, Severity, WalletlinkError};
    pub use walletlink_traits::prelude::*;
}
