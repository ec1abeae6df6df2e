//! JSON-RPC provider tests against a mock node.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use walletlink_provider::{ProviderConfig, RpcHost, RpcProviderHandle};
use walletlink_traits::{HostEvent, HostWallet, ProviderHandle, WalletError};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";

fn result(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": value }))
}

fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": code, "message": message }
    }))
}

async fn mount(server: &MockServer, rpc_method: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(response)
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(server.uri()).with_timeout(5)
}

// ============================================================================
// Provider handle
// ============================================================================

#[tokio::test]
async fn test_get_network() {
    let server = MockServer::start().await;
    mount(&server, "eth_chainId", result(json!("0x2105"))).await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    let info = handle.get_network().await.unwrap();

    assert_eq!(info.chain_id, 8453);
    assert_eq!(info.network().name, "Base Mainnet");
}

#[tokio::test]
async fn test_get_balance() {
    let server = MockServer::start().await;
    mount(&server, "eth_getBalance", result(json!("0x14d1120d7b160000"))).await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    let balance = handle.get_balance(ADDRESS).await.unwrap();

    assert_eq!(balance.smallest_unit(), 1_500_000_000_000_000_000);
    assert_eq!(balance.to_decimal_string(), "1.5");
}

#[tokio::test]
async fn test_balance_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "eth_getBalance",
            "params": [ADDRESS, "latest"]
        })))
        .respond_with(result(json!("0x0")))
        .expect(1)
        .mount(&server)
        .await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    assert!(handle.get_balance(ADDRESS).await.unwrap().is_zero());
}

#[tokio::test]
async fn test_rpc_error_is_reported() {
    let server = MockServer::start().await;
    mount(&server, "eth_getBalance", rpc_error(-32000, "header not found")).await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    let err = handle.get_balance(ADDRESS).await.unwrap_err();

    assert_eq!(
        err,
        WalletError::Rpc {
            code: -32000,
            message: "header not found".into()
        }
    );
}

#[tokio::test]
async fn test_malformed_quantity_is_invalid_response() {
    let server = MockServer::start().await;
    mount(&server, "eth_chainId", result(json!("eight"))).await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    assert!(matches!(
        handle.get_network().await,
        Err(WalletError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_empty_or_signed_balance_is_invalid_response() {
    for raw in ["0x", "0x+1"] {
        let server = MockServer::start().await;
        mount(&server, "eth_getBalance", result(json!(raw))).await;

        let handle = RpcProviderHandle::new(&config(&server)).unwrap();
        assert!(
            matches!(handle.get_balance(ADDRESS).await, Err(WalletError::InvalidResponse(_))),
            "{raw}"
        );
    }
}

#[tokio::test]
async fn test_missing_result_is_invalid_response() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eth_chainId",
        ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1 })),
    )
    .await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    assert!(matches!(
        handle.get_network().await,
        Err(WalletError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let handle = RpcProviderHandle::new(&config(&server)).unwrap();
    assert!(matches!(
        handle.get_network().await,
        Err(WalletError::Transport(_))
    ));
}

// ============================================================================
// Host
// ============================================================================

#[tokio::test]
async fn test_request_accounts() {
    let server = MockServer::start().await;
    mount(&server, "eth_requestAccounts", result(json!([ADDRESS]))).await;

    let host = RpcHost::new(config(&server)).unwrap();
    assert_eq!(host.request_accounts().await.unwrap(), vec![ADDRESS.to_string()]);
}

#[tokio::test]
async fn test_request_accounts_falls_back_to_eth_accounts() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eth_requestAccounts",
        rpc_error(-32601, "the method eth_requestAccounts does not exist"),
    )
    .await;
    mount(&server, "eth_accounts", result(json!([ADDRESS]))).await;

    let host = RpcHost::new(config(&server)).unwrap();
    assert_eq!(host.request_accounts().await.unwrap(), vec![ADDRESS.to_string()]);
}

#[tokio::test]
async fn test_user_rejection() {
    let server = MockServer::start().await;
    mount(
        &server,
        "eth_requestAccounts",
        rpc_error(4001, "User rejected the request."),
    )
    .await;

    let host = RpcHost::new(config(&server)).unwrap();
    assert_eq!(
        host.request_accounts().await.unwrap_err(),
        WalletError::Rejected("User rejected the request.".into())
    );
}

#[tokio::test]
async fn test_host_issues_working_handles() {
    let server = MockServer::start().await;
    mount(&server, "eth_chainId", result(json!("0x46f"))).await;

    let host = RpcHost::new(config(&server)).unwrap();
    let provider = host.provider().unwrap();

    assert_eq!(provider.get_network().await.unwrap().chain_id, 1135);
    assert_eq!(host.chain_id().await.unwrap(), 1135);
}

#[tokio::test]
async fn test_watcher_reports_chain_change() {
    let server = MockServer::start().await;
    mount(&server, "eth_accounts", result(json!([ADDRESS]))).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_chainId" })))
        .respond_with(result(json!("0x1")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount(&server, "eth_chainId", result(json!("0x2105"))).await;

    let host = Arc::new(RpcHost::new(config(&server)).unwrap());
    let mut events = host.subscribe();
    let _watcher = host.spawn_watcher(Duration::from_millis(10));

    let event = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("watcher did not report");
    assert_eq!(event, Some(HostEvent::ChainChanged(Some(8453))));
}

#[tokio::test]
async fn test_watcher_reports_account_change() {
    let server = MockServer::start().await;
    mount(&server, "eth_chainId", result(json!("0x1"))).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_accounts" })))
        .respond_with(result(json!([ADDRESS])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount(&server, "eth_accounts", result(json!([]))).await;

    let host = Arc::new(RpcHost::new(config(&server)).unwrap());
    let mut events = host.subscribe();
    let _watcher = host.spawn_watcher(Duration::from_millis(10));

    let event = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("watcher did not report");
    assert_eq!(event, Some(HostEvent::AccountsChanged(vec![])));
}
