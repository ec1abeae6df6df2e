//! Subcommand implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail};
use walletlink::ethereum::{checksum_address, AlloyProviderHandle};
use walletlink::prelude::*;
use walletlink::rpc::{presets, HandleFactory, ProviderConfig, RpcHost};
use walletlink::traits::{Network, KNOWN_CHAINS};

use crate::types::Engine;

/// Provider handles built through alloy
fn alloy_handle_factory() -> HandleFactory {
    Arc::new(|config: &ProviderConfig| -> WalletResult<Arc<dyn ProviderHandle>> {
        let handle = AlloyProviderHandle::new(config.url.clone())?;
        Ok(Arc::new(handle) as Arc<dyn ProviderHandle>)
    })
}

/// Node-backed host using `engine` for chain queries
pub fn build_host(config: ProviderConfig, engine: Engine) -> anyhow::Result<Arc<RpcHost>> {
    let host = match engine {
        Engine::JsonRpc => RpcHost::new(config)?,
        Engine::Alloy => RpcHost::with_factory(config, alloy_handle_factory())?,
    };
    Ok(Arc::new(host))
}

/// Display form of an address: checksummed when it is a full address
fn display_address(address: &str) -> String {
    checksum_address(address).unwrap_or_else(|_| address.to_string())
}

/// Human readable lines describing `session`
pub fn describe_session(session: &Session) -> Vec<String> {
    if !session.is_connected() {
        return vec!["⚪ Not connected".to_string()];
    }
    let mut lines = Vec::new();
    if let Some(address) = &session.address {
        lines.push(format!("🟢 Connected: {}", display_address(address)));
    }
    match (&session.network, session.chain_id) {
        (Some(network), Some(chain_id)) => lines.push(format!("🌐 Network: {network} ({chain_id})")),
        _ => lines.push("🌐 Network: unknown".to_string()),
    }
    match session.balance_label() {
        Some(balance) => lines.push(format!("💰 Balance: {balance}")),
        None => lines.push("💰 Balance: unavailable".to_string()),
    }
    lines
}

fn print_session(session: &Session) {
    for line in describe_session(session) {
        println!("{line}");
    }
}

fn report_query_error(session: &WalletSession) {
    if let Some(err) = session.last_query_error() {
        eprintln!("⚠️  {err}");
    }
}

pub async fn connect(host: Arc<RpcHost>, watch: bool, interval: Duration) -> anyhow::Result<()> {
    let session = Arc::new(WalletSession::with_host(host.clone()));
    let _listener = session.spawn_listener();

    let state = match session.connect().await {
        Ok(state) => state,
        Err(err) => bail!("❌ {err}"),
    };
    print_session(&state);
    report_query_error(&session);

    if !watch {
        return Ok(());
    }

    println!("\n👀 Watching for account and chain changes (Ctrl-C to stop)");
    let _watcher = host.spawn_watcher(interval);
    let mut changes = session.subscribe();
    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = changes.borrow_and_update().clone();
                println!();
                print_session(&state);
            }
            _ = tokio::signal::ctrl_c() => {
                session.disconnect();
                println!("\n👋 Disconnected");
                break;
            }
        }
    }
    Ok(())
}

/// Lookup result line, denominated in the native currency of `chain_id`
pub fn describe_lookup(address: &str, balance: &str, chain_id: Option<u64>) -> String {
    let symbol = chain_id
        .map(|id| Network::from_chain_id(id).native_symbol)
        .unwrap_or_else(|| "ETH".to_string());
    format!("💰 {}: {} {}", display_address(address), balance, symbol)
}

/// Looks up `address` without connecting. `chain` is the chain the endpoint
/// was picked for; otherwise the node is asked.
pub async fn balance(host: Arc<RpcHost>, address: &str, chain: Option<u64>) -> anyhow::Result<()> {
    let session = WalletSession::with_host(host.clone());
    match session.fetch_balance_of(address).await {
        FetchOutcome::Updated(balance) => {
            let chain_id = match chain {
                Some(chain_id) => Some(chain_id),
                None => match host.chain_id().await {
                    Ok(chain_id) => Some(chain_id),
                    Err(err) => {
                        tracing::debug!(error = %err, "chain id unavailable for lookup");
                        None
                    }
                },
            };
            println!("{}", describe_lookup(address, &balance, chain_id));
            Ok(())
        }
        FetchOutcome::Failed(err) => Err(anyhow!("❌ {err}")),
        FetchOutcome::Skipped(reason) => Err(anyhow!("❌ lookup skipped: {reason:?}")),
        FetchOutcome::Superseded => Err(anyhow!("❌ lookup superseded by a chain change")),
    }
}

pub fn network(chain_id: u64) {
    println!("{}", resolve_network_name(chain_id));
}

pub fn networks() {
    println!("{:>10}  {:<24} {:<6} {:<8} ENDPOINT", "CHAIN ID", "NAME", "SYMBOL", "TESTNET");
    for chain in KNOWN_CHAINS {
        let endpoint = presets::for_chain(chain.chain_id)
            .map(|config| config.url)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>10}  {:<24} {:<6} {:<8} {}",
            chain.chain_id,
            chain.name,
            chain.native_symbol,
            if chain.is_testnet { "yes" } else { "no" },
            endpoint
        );
    }
}
