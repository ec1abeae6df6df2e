//! Conversions between EIP-1193 payloads and walletlink types.

use serde_json::Value;
use walletlink_traits::WalletError;

/// EIP-1193 code for a request the user rejected
pub const USER_REJECTED: i64 = 4001;

/// Parses a `0x` prefixed hex quantity
pub fn parse_hex_quantity(raw: &str) -> Result<u128, WalletError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| WalletError::InvalidResponse(format!("not a hex quantity: {raw}")))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidResponse(format!("not a hex quantity: {raw}")));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| WalletError::InvalidResponse(format!("not a hex quantity: {raw}")))
}

/// Chain id from a `chainChanged` or `eth_chainId` payload.
///
/// Wallets send hex strings; some older ones send decimal strings or numbers.
pub fn chain_id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(raw) if raw.starts_with("0x") || raw.starts_with("0X") => {
            parse_hex_quantity(raw).ok().and_then(|id| u64::try_from(id).ok())
        }
        Value::String(raw) => raw.parse().ok(),
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}

/// Account list from an `accountsChanged` or `eth_requestAccounts` payload.
/// Non-string entries are skipped.
pub fn accounts_from_value(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Maps a rejected request's error object to a [`WalletError`]
pub fn error_from_value(value: &Value) -> WalletError {
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
    match value.get("code").and_then(Value::as_i64) {
        Some(USER_REJECTED) => WalletError::Rejected(message),
        Some(code) => WalletError::Rpc { code, message },
        None => WalletError::Transport(message),
    }
}
