use crate::Error;
use alloy::primitives::U256;
use std::fmt;
use walletlink_traits::Amount;

/// An amount of ether held as wei over the full 256-bit range
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct EthereumAmount {
    /// The number of wei (U256) in the amount
    pub wei: U256,
}

impl EthereumAmount {
    /// Creates a new EthereumAmount from the wei amount (U256)
    pub fn from_wei(wei_amount: U256) -> Self {
        Self { wei: wei_amount }
    }

    /// Creates a new EthereumAmount from the wei amount (u128)
    pub fn from_wei_u128(wei_amount: u128) -> Self {
        Self {
            wei: U256::from(wei_amount),
        }
    }

    /// Returns the number of wei in the amount
    pub fn wei(&self) -> U256 {
        self.wei
    }

    /// Decimal ETH representation as the session shows it, e.g. `1.5`.
    ///
    /// Fails with [`Error::Overflow`] above `u128::MAX` wei.
    pub fn to_decimal_string(&self) -> Result<String, Error> {
        Ok(Amount::try_from(*self)?.to_decimal_string())
    }
}

impl fmt::Display for EthereumAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal_string() {
            Ok(decimal) => write!(f, "{} ETH", decimal),
            Err(_) => write!(f, "{} wei", self.wei),
        }
    }
}

impl From<Amount> for EthereumAmount {
    fn from(amount: Amount) -> Self {
        Self::from_wei_u128(amount.smallest_unit())
    }
}

impl TryFrom<EthereumAmount> for Amount {
    type Error = Error;

    fn try_from(amount: EthereumAmount) -> Result<Self, Self::Error> {
        let wei = u128::try_from(amount.wei).map_err(|_| {
            Error::Overflow(format!("{} wei does not fit in 128 bits", amount.wei))
        })?;
        Ok(Amount::native(wei))
    }
}
