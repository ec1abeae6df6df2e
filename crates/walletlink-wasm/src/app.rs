//! JavaScript facade over [`WalletSession`].

use std::rc::Rc;
use std::sync::Arc;

use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use walletlink::prelude::*;

use crate::host::BrowserHost;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn error_to_js(err: &WalletlinkError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    let _ = js_sys::Reflect::set(&error, &"code".into(), &(err.code() as u32).into());
    error.into()
}

/// Wallet session for a web page.
///
/// Creating it detects `window.ethereum`, acquires a read-only provider and
/// starts listening for wallet notifications.
#[wasm_bindgen]
pub struct WalletApp {
    session: Rc<WalletSession>,
}

#[wasm_bindgen]
impl WalletApp {
    /// Creates the session and attaches to the injected wallet, if any
    #[wasm_bindgen(constructor)]
    pub fn new() -> WalletApp {
        let host = BrowserHost::detect().map(|host| Arc::new(host) as Arc<dyn HostWallet>);
        let events = host.as_ref().map(|host| host.subscribe());
        let session = Rc::new(WalletSession::new(host));
        if let Some(events) = events {
            let listener = Rc::clone(&session);
            spawn_local(async move { listener.listen(events).await });
        }
        WalletApp { session }
    }

    /// Whether a wallet is installed
    #[wasm_bindgen(js_name = hasWallet)]
    pub fn has_wallet(&self) -> bool {
        self.session.has_host()
    }

    /// Asks the wallet for authorization. Resolves to the session state.
    pub fn connect(&self) -> Promise {
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            match session.connect().await {
                Ok(state) => to_js(&state),
                Err(err) => Err(error_to_js(&err)),
            }
        })
    }

    /// Forgets the local session
    pub fn disconnect(&self) {
        self.session.disconnect();
    }

    /// Refreshes the connected account's balance. Resolves to the session state.
    #[wasm_bindgen(js_name = fetchConnectedBalance)]
    pub fn fetch_connected_balance(&self) -> Promise {
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            session.fetch_connected_balance().await;
            to_js(&session.session())
        })
    }

    /// Looks up the balance of any address. Resolves to the query result.
    #[wasm_bindgen(js_name = fetchBalanceOf)]
    pub fn fetch_balance_of(&self, address: String) -> Promise {
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            session.fetch_balance_of(&address).await;
            to_js(&session.query_result())
        })
    }

    /// Current session state
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.session())
    }

    /// Last lookup result
    #[wasm_bindgen(js_name = queryResult)]
    pub fn query_result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.query_result())
    }

    /// Abbreviated connected address for display
    #[wasm_bindgen(js_name = shortAddress)]
    pub fn short_address(&self) -> Option<String> {
        self.session.session().short_address()
    }

    /// Connected balance with its currency symbol
    #[wasm_bindgen(js_name = balanceLabel)]
    pub fn balance_label(&self) -> Option<String> {
        self.session.session().balance_label()
    }

    /// Message of the last failed query
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.session.last_query_error().map(|err| err.to_string())
    }

    /// Calls `callback(state)` whenever the session changes
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: js_sys::Function) {
        let mut changes = self.session.subscribe();
        spawn_local(async move {
            while changes.changed().await.is_ok() {
                let state = changes.borrow_and_update().clone();
                let delivered = to_js(&state).and_then(|state| callback.call1(&JsValue::NULL, &state));
                if let Err(err) = delivered {
                    tracing::warn!(error = ?err, "change callback failed");
                }
            }
        });
    }
}

impl Default for WalletApp {
    fn default() -> Self {
        Self::new()
    }
}
