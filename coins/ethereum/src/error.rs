use thiserror::Error;
use walletlink_traits::WalletError;

/// Custom error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Address is not 20 bytes of hex with a `0x` prefix
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Endpoint URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Node request failed
    #[error("RPC request failed: {0}")]
    Rpc(String),
    /// Arithmetic or conversion overflow
    #[error("Overflow error: {0}")]
    Overflow(String),
    /// Error converting from a hex digit
    #[error("Error converting from hex: {0}")]
    FromStrRadix(#[from] std::num::ParseIntError),
    /// Error decoding hex
    #[error("Error decoding hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl From<Error> for WalletError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidAddress(address) => WalletError::InvalidAddress(address),
            Error::InvalidUrl(_) => WalletError::Unavailable(err.to_string()),
            Error::Rpc(_) => WalletError::Transport(err.to_string()),
            Error::Overflow(_) | Error::FromStrRadix(_) | Error::Hex(_) => {
                WalletError::InvalidResponse(err.to_string())
            }
        }
    }
}
