//! Behaviour of `WalletSession` against a scripted host wallet.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use walletlink::prelude::*;
use walletlink_testing::{EdgeCaseAmounts, Gate, MockHost, MockProvider, ProviderCall};

const A: &str = "0xABC";
const B: &str = "0xDEF";

fn session_over(host: &Arc<MockHost>) -> Arc<WalletSession> {
    Arc::new(WalletSession::with_host(host.clone()))
}

// ============================================================================
// Connect
// ============================================================================

#[tokio::test]
async fn test_connect_without_host_is_provider_unavailable() {
    let session = WalletSession::without_host();

    let err = session.connect().await.unwrap_err();
    assert_eq!(err, WalletlinkError::ProviderUnavailable);
    assert!(err.is_user_visible());
    assert_eq!(session.session(), Session::default());
    assert!(!session.has_provider());
}

#[tokio::test]
async fn test_connect_stores_address_network_and_balance() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_chain_id(1)
        .with_balance(A, 1_500_000_000_000_000_000)
        .shared();
    let session = session_over(&host);

    let state = session.connect().await.unwrap();

    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.address.as_deref(), Some(A));
    assert_eq!(state.network.as_deref(), Some("Ethereum Mainnet"));
    assert_eq!(state.chain_id, Some(1));
    assert_eq!(state.connected_balance.as_deref(), Some("1.5"));
    assert_eq!(state.balance_label().as_deref(), Some("1.5 ETH"));
    assert_eq!(session.session(), state);
    assert_eq!(host.account_requests(), 1);
}

#[tokio::test]
async fn test_connect_rejected_is_connection_denied() {
    let host = MockHost::new().shared();
    host.reject_accounts("User rejected the request.");
    let session = session_over(&host);

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, WalletlinkError::ConnectionDenied { .. }));
    assert!(err.to_string().contains("User rejected"));
    assert_eq!(session.session(), Session::default());
}

#[tokio::test]
async fn test_connect_with_no_accounts_is_connection_denied() {
    let host = MockHost::new().with_accounts(Vec::<String>::new()).shared();
    let session = session_over(&host);

    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, WalletlinkError::ConnectionDenied { .. }));
    assert!(!session.session().is_connected());
}

#[tokio::test]
async fn test_connect_network_failure_keeps_connection() {
    let host = MockHost::new().with_accounts([A]).with_balance(A, 7).shared();
    let session = session_over(&host);

    let provider = Arc::new(MockProvider::new(1).with_balance(A, 7));
    provider.fail_network(Some(WalletError::Transport("timeout".into())));
    host.push_provider(provider);
    // The passive handle was built at construction, the queued one is for connect.
    let state = session.connect().await.unwrap();

    assert!(state.is_connected());
    assert_eq!(state.network, None);
    assert_eq!(state.connected_balance.as_deref(), Some("0.000000000000000007"));
    assert!(matches!(
        session.last_query_error(),
        Some(WalletlinkError::QueryFailed {
            operation: Operation::GetNetwork,
            ..
        })
    ));
}

#[tokio::test]
async fn test_reconnect_with_failed_network_clears_previous_name() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_chain_id(1)
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .shared();
    let session = session_over(&host);
    let state = session.connect().await.unwrap();
    assert_eq!(state.network.as_deref(), Some("Ethereum Mainnet"));

    let provider = Arc::new(MockProvider::new(1).with_balance(A, EdgeCaseAmounts::ONE_ETHER));
    provider.fail_network(Some(WalletError::Transport("timeout".into())));
    host.push_provider(provider);
    let state = session.connect().await.unwrap();

    assert!(state.is_connected());
    assert_eq!(state.address.as_deref(), Some(A));
    assert_eq!(state.network, None);
    assert_eq!(state.chain_id, None);
}

#[tokio::test]
async fn test_connect_with_failed_network_drops_name_seen_while_disconnected() {
    let host = MockHost::new().with_accounts([A]).shared();
    let session = session_over(&host);

    host.set_chain_id(1135);
    session.handle_event(HostEvent::ChainChanged(Some(1135))).await;
    assert_eq!(session.session().network.as_deref(), Some("Lisk Mainnet"));

    let provider = Arc::new(MockProvider::new(1135));
    provider.fail_network(Some(WalletError::Transport("timeout".into())));
    host.push_provider(provider);
    let state = session.connect().await.unwrap();

    assert!(state.is_connected());
    assert_eq!(state.network, None);
    assert_eq!(state.chain_id, None);
}

#[tokio::test]
async fn test_connect_without_provider_handle_stays_connected() {
    let host = MockHost::new().with_accounts([A]).shared();
    let session = session_over(&host);
    host.fail_provider(Some(WalletError::Unavailable("gone".into())));

    let state = session.connect().await.unwrap();
    assert!(state.is_connected());
    assert_eq!(state.network, None);
    assert_eq!(state.connected_balance, None);
    assert!(!session.has_provider());
    assert_eq!(
        session.fetch_connected_balance().await,
        FetchOutcome::Skipped(SkipReason::NoProvider)
    );
}

#[tokio::test]
async fn test_connect_publishes_address_before_network() {
    let host = MockHost::new().with_accounts([A]).shared();
    let session = session_over(&host);

    let provider = Arc::new(MockProvider::new(8453));
    let gate = Gate::new();
    provider.gate_network(gate.clone());
    host.push_provider(provider);

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.connect().await })
    };
    gate.entered().await;

    let partial = session.session();
    assert!(partial.is_connected());
    assert_eq!(partial.address.as_deref(), Some(A));
    assert_eq!(partial.network, None);

    gate.open();
    let state = task.await.unwrap().unwrap();
    assert_eq!(state.network.as_deref(), Some("Base Mainnet"));
}

// ============================================================================
// Disconnect
// ============================================================================

#[tokio::test]
async fn test_disconnect_resets_session() {
    let host = MockHost::new().with_accounts([A]).with_balance(A, 1).shared();
    let session = session_over(&host);
    session.connect().await.unwrap();

    session.disconnect();
    assert_eq!(session.session(), Session::default());
    // The host is not asked for anything.
    assert_eq!(host.account_requests(), 1);
}

#[tokio::test]
async fn test_disconnect_twice_equals_once() {
    let host = MockHost::new().with_accounts([A]).shared();
    let session = session_over(&host);
    session.connect().await.unwrap();

    let mut rx = session.subscribe();
    rx.borrow_and_update();

    session.disconnect();
    let once = session.session();
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    session.disconnect();
    assert_eq!(session.session(), once);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_disconnect_keeps_lookups_working() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_balance(B, EdgeCaseAmounts::ONE_ETHER)
        .shared();
    let session = session_over(&host);
    session.connect().await.unwrap();
    session.disconnect();

    assert_eq!(session.fetch_balance_of(B).await.balance(), Some("1.0"));
}

// ============================================================================
// Balance fetches
// ============================================================================

#[tokio::test]
async fn test_fetch_connected_balance_requires_connection() {
    let host = MockHost::new().shared();
    let session = session_over(&host);

    assert_eq!(
        session.fetch_connected_balance().await,
        FetchOutcome::Skipped(SkipReason::NotConnected)
    );
    let provider = host.latest_provider().unwrap();
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_lookup_leaves_session_untouched() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .with_balance(B, EdgeCaseAmounts::TWO_ETHER)
        .shared();
    let session = session_over(&host);
    session.connect().await.unwrap();
    let before = session.session();

    let outcome = session.fetch_balance_of(B).await;

    assert_eq!(outcome, FetchOutcome::Updated("2.0".to_string()));
    assert_eq!(
        session.query_result(),
        QueryResult {
            queried_address: Some(B.to_string()),
            balance: Some("2.0".to_string()),
        }
    );
    assert_eq!(session.session(), before);
}

#[tokio::test]
async fn test_lookup_before_connect_uses_passive_handle() {
    let host = MockHost::new().with_balance(B, 42).shared();
    let session = session_over(&host);

    assert!(session.has_provider());
    assert_eq!(
        session.fetch_balance_of(B).await.balance(),
        Some("0.000000000000000042")
    );
    assert_eq!(host.account_requests(), 0);
    assert!(!session.session().is_connected());
}

#[tokio::test]
async fn test_lookup_empty_target_is_noop() {
    let host = MockHost::new().shared();
    let session = session_over(&host);

    assert_eq!(
        session.fetch_balance_of("").await,
        FetchOutcome::Skipped(SkipReason::EmptyTarget)
    );
    assert_eq!(host.latest_provider().unwrap().call_count(), 0);
    assert_eq!(session.query_result(), QueryResult::default());
}

#[tokio::test]
async fn test_lookup_without_host_is_noop() {
    let session = WalletSession::without_host();
    assert_eq!(
        session.fetch_balance_of(B).await,
        FetchOutcome::Skipped(SkipReason::NoProvider)
    );
}

#[tokio::test]
async fn test_failed_balance_keeps_previous_value() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .with_balance(B, EdgeCaseAmounts::TWO_ETHER)
        .shared();
    let session = session_over(&host);
    session.connect().await.unwrap();
    session.fetch_balance_of(B).await;

    let provider = host.latest_provider().unwrap();
    provider.fail_balances(Some(WalletError::Rpc {
        code: -32000,
        message: "header not found".into(),
    }));

    let outcome = session.fetch_connected_balance().await;
    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(session.session().connected_balance.as_deref(), Some("1.0"));

    let outcome = session.fetch_balance_of(B).await;
    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(session.query_result().balance.as_deref(), Some("2.0"));

    let err = session.last_query_error().unwrap();
    assert_eq!(err.severity(), Severity::Diagnostic);
    assert!(err.to_string().contains("header not found"));
}

#[tokio::test]
async fn test_lookup_pending_flag() {
    let host = MockHost::new().with_balance(B, 1).shared();
    let session = session_over(&host);
    let gate = Gate::new();
    host.latest_provider().unwrap().gate_balances(gate.clone());
    assert!(!session.is_lookup_pending());

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.fetch_balance_of(B).await })
    };
    gate.entered().await;
    assert!(session.is_lookup_pending());

    gate.open();
    assert!(task.await.unwrap().is_updated());
    assert!(!session.is_lookup_pending());
}

// ============================================================================
// Host notifications
// ============================================================================

#[tokio::test]
async fn test_accounts_changed_empty_disconnects() {
    let host = MockHost::new().with_accounts([A]).with_balance(A, 1).shared();
    let session = session_over(&host);
    session.connect().await.unwrap();

    session.handle_event(HostEvent::AccountsChanged(vec![])).await;
    assert_eq!(session.session(), Session::default());
}

#[tokio::test]
async fn test_accounts_changed_switches_address() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .with_balance(B, EdgeCaseAmounts::TWO_ETHER)
        .shared();
    let session = session_over(&host);
    session.connect().await.unwrap();

    session
        .handle_event(HostEvent::AccountsChanged(vec![B.to_string(), A.to_string()]))
        .await;

    let state = session.session();
    assert!(state.is_connected());
    assert_eq!(state.address.as_deref(), Some(B));
    assert_eq!(state.network.as_deref(), Some("Ethereum Mainnet"));
    assert_eq!(state.connected_balance.as_deref(), Some("2.0"));
}

#[tokio::test]
async fn test_accounts_changed_while_disconnected_connects() {
    let host = MockHost::new()
        .with_chain_id(11155111)
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .shared();
    let session = session_over(&host);

    session
        .handle_event(HostEvent::AccountsChanged(vec![A.to_string()]))
        .await;

    let state = session.session();
    assert!(state.is_connected());
    assert_eq!(state.network.as_deref(), Some("Sepolia Test Network"));
    assert_eq!(state.connected_balance.as_deref(), Some("1.0"));
    assert_eq!(host.account_requests(), 0);
}

#[tokio::test]
async fn test_chain_changed_uses_fresh_handle() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_chain_id(1)
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .shared();
    let session = session_over(&host);
    session.connect().await.unwrap();
    let stale = host.latest_provider().unwrap();
    let stale_calls = stale.call_count();

    host.set_chain_id(8453);
    host.set_balance(A, EdgeCaseAmounts::TWO_ETHER);
    session.handle_event(HostEvent::ChainChanged(Some(8453))).await;

    let state = session.session();
    assert_eq!(state.network.as_deref(), Some("Base Mainnet"));
    assert_eq!(state.chain_id, Some(8453));
    assert_eq!(state.connected_balance.as_deref(), Some("2.0"));

    let fresh = host.latest_provider().unwrap();
    assert_eq!(fresh.chain_id(), 8453);
    assert_eq!(
        fresh.calls(),
        vec![ProviderCall::GetNetwork, ProviderCall::GetBalance(A.to_string())]
    );

    session.fetch_connected_balance().await;
    session.fetch_balance_of(B).await;
    assert_eq!(stale.call_count(), stale_calls);
}

#[tokio::test]
async fn test_chain_changed_clears_network_on_failure() {
    let host = MockHost::new().with_accounts([A]).shared();
    let session = session_over(&host);
    session.connect().await.unwrap();
    assert!(session.session().network.is_some());

    let provider = Arc::new(MockProvider::new(4202));
    provider.fail_network(Some(WalletError::Transport("reset".into())));
    host.push_provider(provider);
    session.handle_event(HostEvent::ChainChanged(Some(4202))).await;

    let state = session.session();
    assert!(state.is_connected());
    assert_eq!(state.network, None);
    assert_eq!(state.chain_id, None);
}

#[tokio::test]
async fn test_chain_changed_while_disconnected_resolves_network() {
    let host = MockHost::new().shared();
    let session = session_over(&host);

    host.set_chain_id(1135);
    session.handle_event(HostEvent::ChainChanged(Some(1135))).await;

    let state = session.session();
    assert!(!state.is_connected());
    assert_eq!(state.network.as_deref(), Some("Lisk Mainnet"));
    assert_eq!(host.latest_provider().unwrap().balance_calls(), 0);
}

// ============================================================================
// Races
// ============================================================================

#[tokio::test]
async fn test_disconnect_discards_in_flight_balance() {
    let host = MockHost::new().with_accounts([A]).with_balance(A, 1).shared();
    let session = session_over(&host);
    session.connect().await.unwrap();

    let gate = Gate::new();
    host.latest_provider().unwrap().gate_balances(gate.clone());
    host.set_balance(A, EdgeCaseAmounts::TWO_ETHER);

    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.fetch_connected_balance().await })
    };
    gate.entered().await;
    session.disconnect();
    gate.open();

    assert_eq!(task.await.unwrap(), FetchOutcome::Superseded);
    assert_eq!(session.session(), Session::default());
}

#[tokio::test]
async fn test_stale_balance_does_not_overwrite_new_chain() {
    let host = MockHost::new()
        .with_accounts([A])
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .shared();
    let session = session_over(&host);
    session.connect().await.unwrap();

    let gate = Gate::new();
    host.latest_provider().unwrap().gate_balances(gate.clone());
    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.fetch_connected_balance().await })
    };
    gate.entered().await;

    host.push_provider(Arc::new(
        MockProvider::new(8453).with_balance(A, 3 * EdgeCaseAmounts::ONE_ETHER),
    ));
    session.handle_event(HostEvent::ChainChanged(Some(8453))).await;
    assert_eq!(session.session().connected_balance.as_deref(), Some("3.0"));

    gate.open();
    assert_eq!(task.await.unwrap(), FetchOutcome::Superseded);
    assert_eq!(session.session().connected_balance.as_deref(), Some("3.0"));
}

#[tokio::test]
async fn test_lookup_from_previous_chain_is_dropped() {
    let host = MockHost::new().with_balance(B, 5).shared();
    let session = session_over(&host);

    let gate = Gate::new();
    host.latest_provider().unwrap().gate_balances(gate.clone());
    let task = {
        let session = session.clone();
        tokio::spawn(async move { session.fetch_balance_of(B).await })
    };
    gate.entered().await;

    session.handle_event(HostEvent::ChainChanged(Some(8453))).await;
    gate.open();

    assert_eq!(task.await.unwrap(), FetchOutcome::Superseded);
    assert_eq!(session.query_result(), QueryResult::default());
    assert!(!session.is_lookup_pending());
}

// ============================================================================
// Listener
// ============================================================================

#[tokio::test]
async fn test_listener_applies_events_and_releases_subscription() {
    let host = MockHost::new()
        .with_balance(A, EdgeCaseAmounts::ONE_ETHER)
        .shared();
    let session = session_over(&host);
    let guard = session.spawn_listener().unwrap();
    assert_eq!(host.subscriber_count(), 1);

    let mut rx = session.subscribe();
    host.emit_accounts([A]);
    let state = timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| state.connected_balance.is_some()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();
    assert_eq!(state.address.as_deref(), Some(A));
    assert_eq!(state.connected_balance.as_deref(), Some("1.0"));

    host.emit_accounts(Vec::<String>::new());
    timeout(Duration::from_secs(5), rx.wait_for(|state| !state.is_connected()))
        .await
        .unwrap()
        .unwrap();

    drop(guard);
    timeout(Duration::from_secs(5), async {
        while host.released_subscriptions() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(host.subscriber_count(), 0);
}

#[tokio::test]
async fn test_spawn_listener_without_host() {
    let session = Arc::new(WalletSession::without_host());
    assert!(session.spawn_listener().is_none());
}
