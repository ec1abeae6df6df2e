//! Host wallet capability over the injected EIP-1193 provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::broadcast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use walletlink_traits::{
    HostEvent, HostEvents, HostWallet, ProviderHandle, WalletError, WalletResult,
};

use crate::bridge::{get_fn, injected_provider, request, to_json};
use crate::convert::{accounts_from_value, chain_id_from_value};
use crate::provider::BrowserProviderHandle;

type Listener = Closure<dyn FnMut(JsValue)>;

/// The page's injected wallet
pub struct BrowserHost {
    provider: JsValue,
    events: broadcast::Sender<HostEvent>,
}

impl BrowserHost {
    /// Detects `window.ethereum`. `None` when no wallet is installed.
    pub fn detect() -> Option<Self> {
        injected_provider().map(Self::new)
    }

    /// Wraps an injected provider object
    pub fn new(provider: JsValue) -> Self {
        let (events, _) = broadcast::channel(32);
        Self { provider, events }
    }

    fn add_listener(&self, event: &str, listener: &Listener) -> WalletResult<()> {
        let on = get_fn(&self.provider, "on")?;
        on.call2(
            &self.provider,
            &JsValue::from_str(event),
            listener.as_ref().unchecked_ref(),
        )
        .map_err(|e| WalletError::Unavailable(format!("register {event} failed: {e:?}")))?;
        Ok(())
    }
}

fn remove_listener(provider: &JsValue, event: &str, listener: &Listener) {
    let removed = get_fn(provider, "removeListener").and_then(|remove| {
        remove
            .call2(
                provider,
                &JsValue::from_str(event),
                listener.as_ref().unchecked_ref(),
            )
            .map_err(|e| WalletError::Unavailable(format!("{e:?}")))
    });
    if let Err(err) = removed {
        tracing::debug!(event, error = %err, "could not detach listener");
    }
}

impl std::fmt::Debug for BrowserHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserHost")
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

#[async_trait(?Send)]
impl HostWallet for BrowserHost {
    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        let accounts = request(&self.provider, "eth_requestAccounts", json!([])).await?;
        Ok(accounts_from_value(&accounts))
    }

    /// Registers `accountsChanged` and `chainChanged` listeners for this
    /// subscription. They are removed when the subscription is dropped.
    fn subscribe(&self) -> HostEvents {
        let accounts_tx = self.events.clone();
        let on_accounts: Listener = Closure::new(move |value: JsValue| {
            let accounts = accounts_from_value(&to_json(value));
            let _ = accounts_tx.send(HostEvent::AccountsChanged(accounts));
        });
        let chain_tx = self.events.clone();
        let on_chain: Listener = Closure::new(move |value: JsValue| {
            let chain_id = chain_id_from_value(&to_json(value));
            let _ = chain_tx.send(HostEvent::ChainChanged(chain_id));
        });

        let receiver = self.events.subscribe();
        let registered = self
            .add_listener("accountsChanged", &on_accounts)
            .and_then(|_| self.add_listener("chainChanged", &on_chain));
        if let Err(err) = registered {
            tracing::warn!(error = %err, "wallet notifications unavailable");
        }

        let provider = self.provider.clone();
        HostEvents::with_release(receiver, move || {
            remove_listener(&provider, "accountsChanged", &on_accounts);
            remove_listener(&provider, "chainChanged", &on_chain);
            tracing::debug!("wallet listeners detached");
        })
    }

    /// A fresh handle over whatever `window.ethereum` is now
    fn provider(&self) -> WalletResult<Arc<dyn ProviderHandle>> {
        let provider = injected_provider().unwrap_or_else(|| self.provider.clone());
        Ok(BrowserProviderHandle::shared(provider))
    }

    fn name(&self) -> &str {
        "window.ethereum"
    }
}
