//! The wallet session state manager.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use walletlink_error::{Operation, Result, WalletlinkError};
use walletlink_traits::{HostEvent, HostEvents, HostWallet, Network, ProviderHandle, WalletError};

use crate::state::{ConnectionStatus, FetchOutcome, QueryResult, Session, SkipReason};

/// Owns the [`Session`] and [`QueryResult`] and is the only caller into the
/// host wallet.
///
/// State is published through `watch` channels, so any number of observers
/// can follow it with [`WalletSession::subscribe`] and
/// [`WalletSession::subscribe_query`].
///
/// Two counters order concurrent work. `session_epoch` moves on every reset
/// and chain change, `chain_epoch` only on chain changes. A query captures the
/// counter it depends on before suspending and drops its result if the counter
/// moved in the meantime.
pub struct WalletSession {
    host: Option<Arc<dyn HostWallet>>,
    provider: RwLock<Option<Arc<dyn ProviderHandle>>>,
    session: watch::Sender<Session>,
    query: watch::Sender<QueryResult>,
    lookup_pending: watch::Sender<bool>,
    lookups_in_flight: AtomicUsize,
    session_epoch: AtomicU64,
    chain_epoch: AtomicU64,
    last_error: Mutex<Option<WalletlinkError>>,
}

impl WalletSession {
    /// Creates a session over the given host capability.
    ///
    /// When a host is present a provider handle is acquired right away,
    /// without asking for authorization, so lookups work before `connect`.
    pub fn new(host: Option<Arc<dyn HostWallet>>) -> Self {
        let session = Self {
            host,
            provider: RwLock::new(None),
            session: watch::Sender::new(Session::default()),
            query: watch::Sender::new(QueryResult::default()),
            lookup_pending: watch::Sender::new(false),
            lookups_in_flight: AtomicUsize::new(0),
            session_epoch: AtomicU64::new(0),
            chain_epoch: AtomicU64::new(0),
            last_error: Mutex::new(None),
        };
        if let Some(host) = session.host.as_ref() {
            debug!(host = host.name(), "passive provider initialization");
            let provider = session.acquire_provider(host.as_ref());
            *session.provider.write() = provider;
        } else {
            debug!("no host wallet capability present");
        }
        session
    }

    /// Creates a session over a present host capability
    pub fn with_host(host: Arc<dyn HostWallet>) -> Self {
        Self::new(Some(host))
    }

    /// Creates a session for an environment without a wallet
    pub fn without_host() -> Self {
        Self::new(None)
    }

    // ------------------------------------------------------------------------
    // Observable state
    // ------------------------------------------------------------------------

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Snapshot of the most recent lookup result
    pub fn query_result(&self) -> QueryResult {
        self.query.borrow().clone()
    }

    /// Follows session changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Follows lookup result changes
    pub fn subscribe_query(&self) -> watch::Receiver<QueryResult> {
        self.query.subscribe()
    }

    /// Follows the lookup progress flag
    pub fn subscribe_lookup_pending(&self) -> watch::Receiver<bool> {
        self.lookup_pending.subscribe()
    }

    /// Returns true while at least one lookup is in flight
    pub fn is_lookup_pending(&self) -> bool {
        *self.lookup_pending.borrow()
    }

    /// The most recent recovered query failure
    pub fn last_query_error(&self) -> Option<WalletlinkError> {
        self.last_error.lock().clone()
    }

    /// Returns true if a host wallet capability is present
    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// Returns true if a provider handle is available for queries
    pub fn has_provider(&self) -> bool {
        self.provider.read().is_some()
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Requests account authorization and connects the primary account.
    ///
    /// Publishes the address first, then the network name, then the balance.
    /// Only authorization failures are returned; a failed network or balance
    /// query leaves the session connected with that field unset.
    pub async fn connect(&self) -> Result<Session> {
        let Some(host) = self.host.clone() else {
            info!("connect requested without a wallet capability");
            return Err(WalletlinkError::ProviderUnavailable);
        };

        let accounts = host.request_accounts().await.map_err(|err| {
            info!(error = %err, "wallet authorization failed");
            WalletlinkError::from_host(Operation::RequestAccounts, err)
        })?;
        let address = match accounts.into_iter().next() {
            Some(address) if !address.is_empty() => address,
            _ => {
                info!("wallet authorized no accounts");
                return Err(WalletlinkError::denied("wallet returned no accounts"));
            }
        };

        info!(address = %address, "wallet connected");
        let epoch = self.begin_connect(&address);

        let provider = self.acquire_provider(host.as_ref());
        *self.provider.write() = provider.clone();

        if let Some(provider) = provider {
            self.resolve_network(provider.as_ref(), epoch).await;
        }
        self.fetch_connected_balance().await;

        Ok(self.session())
    }

    /// Resets the session to its initial disconnected state.
    ///
    /// Does not touch the host and keeps the provider handle, so lookups keep
    /// working. Calling it on a disconnected session changes nothing.
    pub fn disconnect(&self) {
        let changed = self.session.send_if_modified(|session| {
            self.session_epoch.fetch_add(1, Ordering::SeqCst);
            if *session == Session::default() {
                return false;
            }
            *session = Session::default();
            true
        });
        if changed {
            info!("wallet disconnected");
        }
    }

    /// Refreshes the balance of the connected account.
    ///
    /// Does nothing when disconnected or without a provider handle. A failed
    /// query keeps the previous balance.
    pub async fn fetch_connected_balance(&self) -> FetchOutcome {
        let (address, epoch) = {
            let session = self.session.borrow();
            match (&session.status, &session.address) {
                (ConnectionStatus::Connected, Some(address)) => {
                    (address.clone(), self.session_epoch.load(Ordering::SeqCst))
                }
                _ => {
                    debug!("balance refresh skipped: not connected");
                    return FetchOutcome::Skipped(SkipReason::NotConnected);
                }
            }
        };
        let Some(provider) = self.current_provider() else {
            debug!("balance refresh skipped: no provider handle");
            return FetchOutcome::Skipped(SkipReason::NoProvider);
        };

        let amount = match provider.get_balance(&address).await {
            Ok(amount) => amount,
            Err(err) => return self.query_failed(Operation::GetBalance, err),
        };

        let decimal = amount.to_decimal_string();
        let mut stored = false;
        self.session.send_if_modified(|session| {
            if self.session_epoch.load(Ordering::SeqCst) != epoch
                || session.address.as_deref() != Some(address.as_str())
            {
                return false;
            }
            stored = true;
            if session.connected_balance.as_deref() == Some(decimal.as_str()) {
                return false;
            }
            session.connected_balance = Some(decimal.clone());
            true
        });

        if stored {
            debug!(address = %address, balance = %decimal, "connected balance updated");
            FetchOutcome::Updated(decimal)
        } else {
            debug!(address = %address, "stale connected balance discarded");
            FetchOutcome::Superseded
        }
    }

    /// Looks up the balance of an arbitrary address.
    ///
    /// Stores the result into the [`QueryResult`] without touching the
    /// session. An empty target or a missing provider handle does nothing; a
    /// failed query keeps the previous result.
    pub async fn fetch_balance_of(&self, target: &str) -> FetchOutcome {
        if target.is_empty() {
            debug!("lookup skipped: empty target");
            return FetchOutcome::Skipped(SkipReason::EmptyTarget);
        }
        let Some(provider) = self.current_provider() else {
            debug!("lookup skipped: no provider handle");
            return FetchOutcome::Skipped(SkipReason::NoProvider);
        };

        let _pending = LookupGuard::enter(self);
        let epoch = self.chain_epoch.load(Ordering::SeqCst);
        let amount = match provider.get_balance(target).await {
            Ok(amount) => amount,
            Err(err) => return self.query_failed(Operation::GetBalance, err),
        };

        let decimal = amount.to_decimal_string();
        let mut stored = false;
        self.query.send_if_modified(|query| {
            if self.chain_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            stored = true;
            *query = QueryResult {
                queried_address: Some(target.to_string()),
                balance: Some(decimal.clone()),
            };
            true
        });

        if stored {
            debug!(address = %target, balance = %decimal, "lookup stored");
            FetchOutcome::Updated(decimal)
        } else {
            debug!(address = %target, "lookup from previous chain discarded");
            FetchOutcome::Superseded
        }
    }

    // ------------------------------------------------------------------------
    // Host notifications
    // ------------------------------------------------------------------------

    /// Applies one host notification
    pub async fn handle_event(&self, event: HostEvent) {
        match event {
            HostEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                Some(address) if !address.is_empty() => self.accounts_changed(address).await,
                _ => {
                    debug!("host reported no accounts");
                    self.disconnect();
                }
            },
            HostEvent::ChainChanged(chain_id) => self.chain_changed(chain_id).await,
        }
    }

    /// Applies notifications until the subscription closes
    pub async fn listen(&self, mut events: HostEvents) {
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
        }
        debug!("host event stream closed");
    }

    /// Subscribes to the host and applies its notifications on a tokio task.
    ///
    /// Returns `None` without a host. Dropping the guard stops the task and
    /// releases the subscription.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn_listener(self: &Arc<Self>) -> Option<ListenerGuard> {
        let events = self.host.as_ref()?.subscribe();
        let session = Arc::clone(self);
        let task = tokio::spawn(async move { session.listen(events).await });
        Some(ListenerGuard { task })
    }

    async fn accounts_changed(&self, address: String) {
        info!(address = %address, "host switched account");
        let epoch = self.set_connected(&address);

        let needs_network = self.session.borrow().network.is_none();
        if needs_network {
            if let Some(provider) = self.current_provider().or_else(|| self.reacquire_provider()) {
                self.resolve_network(provider.as_ref(), epoch).await;
            }
        }
        self.fetch_connected_balance().await;
    }

    async fn chain_changed(&self, chain_id: Option<u64>) {
        info!(chain_id = ?chain_id, "host switched chain");
        let mut epoch = 0;
        self.session.send_if_modified(|session| {
            self.chain_epoch.fetch_add(1, Ordering::SeqCst);
            epoch = self.session_epoch.fetch_add(1, Ordering::SeqCst) + 1;
            let had_network = session.network.is_some() || session.chain_id.is_some();
            session.network = None;
            session.chain_id = None;
            had_network
        });

        let Some(provider) = self.reacquire_provider() else {
            return;
        };
        self.resolve_network(provider.as_ref(), epoch).await;
        let connected = self.session.borrow().is_connected();
        if connected {
            self.fetch_connected_balance().await;
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Publishes `address` as connected with the network cleared and returns
    /// the epoch it was published under.
    fn begin_connect(&self, address: &str) -> u64 {
        let mut epoch = 0;
        self.session.send_if_modified(|session| {
            epoch = self.session_epoch.load(Ordering::SeqCst);
            let unchanged = session.is_connected()
                && session.address.as_deref() == Some(address)
                && session.network.is_none()
                && session.chain_id.is_none();
            if unchanged {
                return false;
            }
            if session.address.as_deref() != Some(address) {
                session.connected_balance = None;
            }
            session.status = ConnectionStatus::Connected;
            session.address = Some(address.to_string());
            session.network = None;
            session.chain_id = None;
            true
        });
        epoch
    }

    /// Publishes `address` as connected and returns the epoch it was
    /// published under.
    fn set_connected(&self, address: &str) -> u64 {
        let mut epoch = 0;
        self.session.send_if_modified(|session| {
            epoch = self.session_epoch.load(Ordering::SeqCst);
            if session.is_connected() && session.address.as_deref() == Some(address) {
                return false;
            }
            if session.address.as_deref() != Some(address) {
                session.connected_balance = None;
            }
            session.status = ConnectionStatus::Connected;
            session.address = Some(address.to_string());
            true
        });
        epoch
    }

    /// Resolves and stores the network name unless the session moved past
    /// `epoch` while the query was in flight.
    async fn resolve_network(&self, provider: &dyn ProviderHandle, epoch: u64) {
        let info = match provider.get_network().await {
            Ok(info) => info,
            Err(err) => {
                self.query_failed(Operation::GetNetwork, err);
                return;
            }
        };

        let network = Network::from_chain_id(info.chain_id);
        let stored = self.session.send_if_modified(|session| {
            if self.session_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            session.network = Some(network.name.clone());
            session.chain_id = Some(info.chain_id);
            true
        });
        if stored {
            debug!(chain_id = info.chain_id, network = %network.name, "network resolved");
        }
    }

    fn current_provider(&self) -> Option<Arc<dyn ProviderHandle>> {
        self.provider.read().clone()
    }

    fn reacquire_provider(&self) -> Option<Arc<dyn ProviderHandle>> {
        let host = self.host.as_ref()?;
        let provider = self.acquire_provider(host.as_ref());
        *self.provider.write() = provider.clone();
        provider
    }

    fn acquire_provider(&self, host: &dyn HostWallet) -> Option<Arc<dyn ProviderHandle>> {
        match host.provider() {
            Ok(provider) => Some(provider),
            Err(err) => {
                self.query_failed(Operation::AcquireProvider, err);
                None
            }
        }
    }

    fn query_failed(&self, operation: Operation, err: WalletError) -> FetchOutcome {
        let err = WalletlinkError::from_host(operation, err);
        warn!(error = %err, "query failed, keeping previous value");
        *self.last_error.lock() = Some(err.clone());
        FetchOutcome::Failed(err)
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("host", &self.host.as_ref().map(|host| host.name().to_string()))
            .field("has_provider", &self.has_provider())
            .field("session", &*self.session.borrow())
            .field("query", &*self.query.borrow())
            .finish()
    }
}

/// Keeps `lookup_pending` raised while at least one lookup runs
struct LookupGuard<'a> {
    session: &'a WalletSession,
}

impl<'a> LookupGuard<'a> {
    fn enter(session: &'a WalletSession) -> Self {
        if session.lookups_in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            session.lookup_pending.send_replace(true);
        }
        Self { session }
    }
}

impl Drop for LookupGuard<'_> {
    fn drop(&mut self) {
        if self.session.lookups_in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.session.lookup_pending.send_replace(false);
        }
    }
}

/// Running host listener. Dropping it stops the listener.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct ListenerGuard {
    task: tokio::task::JoinHandle<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl ListenerGuard {
    /// Returns true once the host event stream has closed
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
