//! # walletlink WASM
//!
//! Browser bindings for the walletlink session manager. The injected
//! `window.ethereum` wallet is the host capability.
//!
//! ## Usage in JavaScript/TypeScript
//!
//! ```javascript
//! import init, { WalletApp } from 'walletlink-wasm';
//!
//! async function main() {
//!     await init();
//!
//!     const app = new WalletApp();
//!     app.onChange((state) => render(state));
//!
//!     if (!app.hasWallet()) {
//!         alert("Please install MetaMask!");
//!         return;
//!     }
//!     const state = await app.connect();
//!     console.log(app.shortAddress(), state.network, app.balanceLabel());
//!
//!     const query = await app.fetchBalanceOf("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
//!     console.log(query.balance);
//! }
//! ```

use wasm_bindgen::prelude::*;

pub mod convert;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod bridge;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod provider;

#[cfg(target_arch = "wasm32")]
pub use app::WalletApp;
#[cfg(target_arch = "wasm32")]
pub use host::BrowserHost;
#[cfg(target_arch = "wasm32")]
pub use provider::BrowserProviderHandle;

// Initialize panic hook for better error messages in browser console
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the WASM module. Runs automatically on load.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();
    #[cfg(target_arch = "wasm32")]
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

/// Returns the walletlink WASM version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Display Utilities
// ============================================================================

/// Human readable name of a chain id
#[wasm_bindgen(js_name = networkName)]
pub fn network_name(chain_id: u64) -> String {
    walletlink::resolve_network_name(chain_id).to_string()
}

/// Formats a wei amount given as a decimal string, e.g. `"1500000000000000000"` to `"1.5"`
#[wasm_bindgen(js_name = formatWei)]
pub fn format_wei(wei: &str) -> Result<String, JsError> {
    let wei: u128 = wei
        .parse()
        .map_err(|e| JsError::new(&format!("Invalid wei value: {}", e)))?;
    Ok(walletlink::traits::Amount::native(wei).to_decimal_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_name() {
        assert_eq!(network_name(1), "Ethereum Mainnet");
        assert_eq!(network_name(1291), "Swisstronik Testnet");
        assert_eq!(network_name(999), "Unknown Network");
    }

    #[test]
    fn test_format_wei() {
        assert_eq!(format_wei("1500000000000000000").unwrap(), "1.5");
        assert_eq!(format_wei("0").unwrap(), "0.0");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
    }
}
