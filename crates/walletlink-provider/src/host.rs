//! Host wallet capability backed by a JSON-RPC node.
//!
//! A node has no user to prompt, so authorization returns the node's unlocked
//! accounts. Changes are observed by polling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use walletlink_traits::{HostEvent, HostEvents, HostWallet, ProviderHandle, WalletResult};

use crate::client::RpcClient;
use crate::config::ProviderConfig;
use crate::handle::{parse_chain_id, RpcProviderHandle};
use crate::{ProviderError, Result, METHOD_NOT_FOUND};

/// Builds provider handles for an endpoint
pub type HandleFactory =
    Arc<dyn Fn(&ProviderConfig) -> WalletResult<Arc<dyn ProviderHandle>> + Send + Sync>;

/// Default factory producing [`RpcProviderHandle`]s
pub fn rpc_handle_factory() -> HandleFactory {
    Arc::new(|config: &ProviderConfig| -> WalletResult<Arc<dyn ProviderHandle>> {
        let handle = RpcProviderHandle::new(config)?;
        Ok(Arc::new(handle) as Arc<dyn ProviderHandle>)
    })
}

/// Node-backed host wallet
pub struct RpcHost {
    config: ProviderConfig,
    client: Arc<RpcClient>,
    factory: HandleFactory,
    events: broadcast::Sender<HostEvent>,
}

impl RpcHost {
    /// Creates a host for the endpoint in `config`
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Self::with_factory(config, rpc_handle_factory())
    }

    /// Creates a host that builds its provider handles with `factory`
    pub fn with_factory(config: ProviderConfig, factory: HandleFactory) -> Result<Self> {
        config.validate()?;
        let client = RpcClient::with_config(config.http_config(), config.rate_limit)?;
        let (events, _) = broadcast::channel(32);
        tracing::info!(url = %config.url, "rpc host ready");
        Ok(Self {
            config,
            client: Arc::new(client),
            factory,
            events,
        })
    }

    /// The endpoint configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Accounts currently exposed by the node
    pub async fn accounts(&self) -> Result<Vec<String>> {
        self.client
            .rpc_call(&self.config.url, "eth_accounts", Vec::<()>::new())
            .await
    }

    /// Current chain id of the node
    pub async fn chain_id(&self) -> Result<u64> {
        let raw: String = self
            .client
            .rpc_call(&self.config.url, "eth_chainId", Vec::<()>::new())
            .await?;
        parse_chain_id(&raw)
    }

    /// Pushes an accounts-changed notification to every subscriber
    pub fn notify_accounts_changed(&self, accounts: Vec<String>) {
        // Sending without subscribers is fine.
        let _ = self.events.send(HostEvent::AccountsChanged(accounts));
    }

    /// Pushes a chain-changed notification to every subscriber
    pub fn notify_chain_changed(&self, chain_id: Option<u64>) {
        let _ = self.events.send(HostEvent::ChainChanged(chain_id));
    }

    /// Polls the node every `interval` and reports account and chain changes.
    ///
    /// The first poll only records the baseline. Failed polls are skipped.
    /// Dropping the guard stops polling.
    pub fn spawn_watcher(self: &Arc<Self>, interval: Duration) -> WatcherGuard {
        let host = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last_accounts: Option<Vec<String>> = None;
            let mut last_chain: Option<u64> = None;
            loop {
                ticker.tick().await;
                match host.accounts().await {
                    Ok(accounts) => {
                        if last_accounts.as_ref().is_some_and(|last| *last != accounts) {
                            tracing::debug!(?accounts, "node accounts changed");
                            host.notify_accounts_changed(accounts.clone());
                        }
                        last_accounts = Some(accounts);
                    }
                    Err(err) => tracing::debug!(error = %err, "account poll failed"),
                }
                match host.chain_id().await {
                    Ok(chain_id) => {
                        if last_chain.is_some_and(|last| last != chain_id) {
                            tracing::debug!(chain_id, "node chain changed");
                            host.notify_chain_changed(Some(chain_id));
                        }
                        last_chain = Some(chain_id);
                    }
                    Err(err) => tracing::debug!(error = %err, "chain poll failed"),
                }
            }
        });
        WatcherGuard { task }
    }
}

impl std::fmt::Debug for RpcHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcHost")
            .field("url", &self.config.url)
            .field("client", &self.client)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

#[async_trait]
impl HostWallet for RpcHost {
    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        let requested: Result<Vec<String>> = self
            .client
            .rpc_call(&self.config.url, "eth_requestAccounts", Vec::<()>::new())
            .await;
        match requested {
            Err(ProviderError::RpcError { code, .. }) if code == METHOD_NOT_FOUND => {
                tracing::debug!("eth_requestAccounts unsupported, using eth_accounts");
                Ok(self.accounts().await?)
            }
            other => Ok(other?),
        }
    }

    fn subscribe(&self) -> HostEvents {
        HostEvents::new(self.events.subscribe())
    }

    fn provider(&self) -> WalletResult<Arc<dyn ProviderHandle>> {
        (self.factory)(&self.config)
    }

    fn name(&self) -> &str {
        "json-rpc"
    }
}

/// Running change watcher. Dropping it stops polling.
#[derive(Debug)]
pub struct WatcherGuard {
    task: JoinHandle<()>,
}

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
