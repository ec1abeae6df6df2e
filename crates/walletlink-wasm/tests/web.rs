//! Browser tests. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use walletlink_wasm::{format_wei, network_name, WalletApp};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_network_names_from_js() {
    assert_eq!(network_name(8453), "Base Mainnet");
    assert_eq!(network_name(84531), "Base Goerli");
}

#[wasm_bindgen_test]
fn test_format_wei_rejects_garbage() {
    assert!(format_wei("1.5").is_err());
}

#[wasm_bindgen_test]
fn test_app_without_injected_wallet() {
    let app = WalletApp::new();
    assert!(!app.has_wallet());
    assert!(app.short_address().is_none());
    app.disconnect();
    assert!(app.balance_label().is_none());
}
