//! Provider handle over the injected provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use wasm_bindgen::JsValue;
use walletlink_traits::{Amount, ChainInfo, ProviderHandle, WalletError, WalletResult};

use crate::bridge::request;
use crate::convert::{chain_id_from_value, parse_hex_quantity};

/// Read-only query handle bound to one `window.ethereum` object
#[derive(Debug, Clone)]
pub struct BrowserProviderHandle {
    provider: JsValue,
}

impl BrowserProviderHandle {
    /// Wraps an injected provider object
    pub fn new(provider: JsValue) -> Self {
        Self { provider }
    }

    /// As a shared trait object
    pub fn shared(provider: JsValue) -> Arc<dyn ProviderHandle> {
        Arc::new(Self::new(provider))
    }
}

#[async_trait(?Send)]
impl ProviderHandle for BrowserProviderHandle {
    async fn get_network(&self) -> WalletResult<ChainInfo> {
        let raw = request(&self.provider, "eth_chainId", json!([])).await?;
        chain_id_from_value(&raw)
            .map(ChainInfo::new)
            .ok_or_else(|| WalletError::InvalidResponse(format!("invalid chain id {raw}")))
    }

    async fn get_balance(&self, address: &str) -> WalletResult<Amount> {
        let raw = request(&self.provider, "eth_getBalance", json!([address, "latest"])).await?;
        match raw {
            Value::String(quantity) => Ok(Amount::native(parse_hex_quantity(&quantity)?)),
            other => Err(WalletError::InvalidResponse(format!("invalid balance {other}"))),
        }
    }
}
