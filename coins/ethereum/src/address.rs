//! Address validation and EIP-55 checksum formatting.

use std::fmt;

use tiny_keccak::{Hasher, Keccak};

use crate::Error;

/// Represents the format of an Ethereum address (checksummed or non-checksummed)
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthereumFormat {
    #[default]
    /// Mixed case according to the EIP-55 checksum. This is the default.
    Checksummed,
    /// All lowercase
    NonChecksummed,
}

impl fmt::Display for EthereumFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EthereumFormat::Checksummed => write!(f, "Checksummed"),
            EthereumFormat::NonChecksummed => write!(f, "NonChecksummed"),
        }
    }
}

/// Lowercase hex digits of `address` without the `0x` prefix.
///
/// Fails unless the input is `0x` followed by exactly 40 hex digits.
fn hex_digits(address: &str) -> Result<String, Error> {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| Error::InvalidAddress(address.to_string()))?;
    if digits.len() != 40 {
        return Err(Error::InvalidAddress(address.to_string()));
    }
    hex::decode(digits)?;
    Ok(digits.to_lowercase())
}

/// Whether `address` is a well-formed 20 byte hex address
pub fn is_valid_address(address: &str) -> bool {
    hex_digits(address).is_ok()
}

/// Formats `address` in the requested format
pub fn format_address(address: &str, format: EthereumFormat) -> Result<String, Error> {
    let digits = hex_digits(address)?;
    match format {
        EthereumFormat::NonChecksummed => Ok(format!("0x{}", digits)),
        EthereumFormat::Checksummed => {
            let mut digest = [0u8; 32];
            let mut hasher = Keccak::v256();
            hasher.update(digits.as_bytes());
            hasher.finalize(&mut digest);
            let digest_hex = hex::encode(digest);

            let mut checksummed = String::with_capacity(42);
            checksummed.push_str("0x");
            for (i, address_char) in digits.chars().enumerate() {
                let nibble = u8::from_str_radix(&digest_hex[i..i + 1], 16)?;
                if nibble >= 8 {
                    checksummed.push(address_char.to_ascii_uppercase());
                } else {
                    checksummed.push(address_char);
                }
            }
            Ok(checksummed)
        }
    }
}

/// EIP-55 checksummed form of `address`
pub fn checksum_address(address: &str) -> Result<String, Error> {
    format_address(address, EthereumFormat::Checksummed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eip55_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            assert_eq!(checksum_address(&expected.to_lowercase()).unwrap(), expected);
            assert_eq!(checksum_address(expected).unwrap(), expected);
        }
    }

    #[test]
    fn test_non_checksummed_is_lowercase() {
        let formatted = format_address(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            EthereumFormat::NonChecksummed,
        )
        .unwrap();
        assert_eq!(formatted, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x"));
        assert!(!is_valid_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea"));
        assert!(!is_valid_address("0xZZaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(is_valid_address("0x0000000000000000000000000000000000000000"));
    }
}
