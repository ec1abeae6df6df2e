//! Access to the injected `window.ethereum` object.

use serde_json::{json, Value};
use wasm_bindgen::{JsCast, JsValue};
use walletlink_traits::{WalletError, WalletResult};

use crate::convert::error_from_value;

/// The injected provider object, if the page has one
pub fn injected_provider() -> Option<JsValue> {
    let window = web_sys::window()?;
    let provider = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
    if provider.is_null() || provider.is_undefined() {
        None
    } else {
        Some(provider)
    }
}

/// Reads a property from a JS object
pub fn get_prop(target: &JsValue, key: &str) -> WalletResult<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| WalletError::Unavailable(format!("read property {key} failed: {e:?}")))
}

/// Reads a function property from a JS object
pub fn get_fn(target: &JsValue, key: &str) -> WalletResult<js_sys::Function> {
    get_prop(target, key)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| WalletError::Unavailable(format!("provider has no {key} function")))
}

/// Converts a JS value into JSON, `null` when it has no JSON form
pub fn to_json(value: JsValue) -> Value {
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

/// Converts a rejection reason into a [`WalletError`].
///
/// Provider errors are often `Error` instances whose fields are not
/// enumerable, so `code` and `message` are read directly.
pub fn rejection_error(reason: JsValue) -> WalletError {
    let code = js_sys::Reflect::get(&reason, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64());
    let message = js_sys::Reflect::get(&reason, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| reason.as_string())
        .unwrap_or_else(|| format!("{reason:?}"));
    let payload = match code {
        Some(code) => json!({ "code": code as i64, "message": message }),
        None => json!({ "message": message }),
    };
    error_from_value(&payload)
}

/// Sends an EIP-1193 `request` and waits for the result
pub async fn request(provider: &JsValue, method: &str, params: Value) -> WalletResult<Value> {
    let request_fn = get_fn(provider, "request")?;
    let payload = json!({ "method": method, "params": params });
    let payload = serde_wasm_bindgen::to_value(&payload)
        .map_err(|e| WalletError::Transport(format!("failed to encode {method}: {e}")))?;
    let promise = request_fn
        .call1(provider, &payload)
        .map_err(rejection_error)?
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| WalletError::InvalidResponse(format!("{method} did not return a promise")))?;
    let result = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(rejection_error)?;
    Ok(to_json(result))
}
