//! In-memory host wallet and provider handles.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{broadcast, Notify, Semaphore};
use walletlink_traits::{
    Amount, ChainInfo, HostEvent, HostEvents, HostWallet, ProviderHandle, WalletError,
    WalletResult,
};

type BalanceTable = Arc<Mutex<HashMap<String, u128>>>;

/// Holds provider calls until the test lets them through.
///
/// ```ignore
/// let gate = Gate::new();
/// provider.gate_balances(gate.clone());
/// let fetch = tokio::spawn(async move { session.fetch_connected_balance().await });
/// gate.entered().await;
/// // ... change the session while the query is in flight ...
/// gate.open();
/// ```
#[derive(Debug)]
pub struct Gate {
    entered: Notify,
    permits: Semaphore,
}

impl Gate {
    /// Creates a closed gate
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            permits: Semaphore::new(0),
        })
    }

    /// Waits until a call reached the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets one waiting call through
    pub fn open(&self) {
        self.permits.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

/// A call observed by a [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// `get_network`
    GetNetwork,
    /// `get_balance(address)`
    GetBalance(String),
}

/// Scriptable provider handle bound to a fixed chain
#[derive(Debug)]
pub struct MockProvider {
    chain_id: u64,
    balances: BalanceTable,
    calls: Mutex<Vec<ProviderCall>>,
    balance_error: Mutex<Option<WalletError>>,
    network_error: Mutex<Option<WalletError>>,
    balance_gate: Mutex<Option<Arc<Gate>>>,
    network_gate: Mutex<Option<Arc<Gate>>>,
}

impl MockProvider {
    /// Creates a provider on `chain_id` where every address holds zero
    pub fn new(chain_id: u64) -> Self {
        Self::with_balance_table(chain_id, Arc::default())
    }

    fn with_balance_table(chain_id: u64, balances: BalanceTable) -> Self {
        Self {
            chain_id,
            balances,
            calls: Mutex::new(Vec::new()),
            balance_error: Mutex::new(None),
            network_error: Mutex::new(None),
            balance_gate: Mutex::new(None),
            network_gate: Mutex::new(None),
        }
    }

    /// Sets the balance of `address` in wei
    pub fn with_balance(self, address: &str, wei: u128) -> Self {
        self.set_balance(address, wei);
        self
    }

    /// Sets the balance of `address` in wei
    pub fn set_balance(&self, address: &str, wei: u128) {
        self.balances.lock().insert(address.to_string(), wei);
    }

    /// Makes every balance query fail with `error`, `None` to recover
    pub fn fail_balances(&self, error: Option<WalletError>) {
        *self.balance_error.lock() = error;
    }

    /// Makes every network query fail with `error`, `None` to recover
    pub fn fail_network(&self, error: Option<WalletError>) {
        *self.network_error.lock() = error;
    }

    /// Holds balance queries at `gate`
    pub fn gate_balances(&self, gate: Arc<Gate>) {
        *self.balance_gate.lock() = Some(gate);
    }

    /// Holds network queries at `gate`
    pub fn gate_network(&self, gate: Arc<Gate>) {
        *self.network_gate.lock() = Some(gate);
    }

    /// The chain this handle is bound to
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of balance queries made so far
    pub fn balance_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, ProviderCall::GetBalance(_)))
            .count()
    }
}

#[async_trait]
impl ProviderHandle for MockProvider {
    async fn get_network(&self) -> WalletResult<ChainInfo> {
        self.calls.lock().push(ProviderCall::GetNetwork);
        let gate = self.network_gate.lock().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if let Some(err) = self.network_error.lock().clone() {
            return Err(err);
        }
        Ok(ChainInfo::new(self.chain_id))
    }

    async fn get_balance(&self, address: &str) -> WalletResult<Amount> {
        self.calls
            .lock()
            .push(ProviderCall::GetBalance(address.to_string()));
        let gate = self.balance_gate.lock().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if let Some(err) = self.balance_error.lock().clone() {
            return Err(err);
        }
        let wei = self.balances.lock().get(address).copied().unwrap_or(0);
        Ok(Amount::native(wei))
    }
}

/// Scriptable injected wallet.
///
/// Provider handles are built on the host's current chain and share its
/// balance table, unless a prepared handle was queued with
/// [`MockHost::push_provider`].
#[derive(Debug)]
pub struct MockHost {
    accounts: Mutex<WalletResult<Vec<String>>>,
    chain_id: Mutex<u64>,
    balances: BalanceTable,
    queued: Mutex<VecDeque<Arc<MockProvider>>>,
    issued: Mutex<Vec<Arc<MockProvider>>>,
    provider_error: Mutex<Option<WalletError>>,
    events: broadcast::Sender<HostEvent>,
    account_requests: AtomicUsize,
    released: Arc<AtomicUsize>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    /// Creates a host on Ethereum Mainnet that authorizes no accounts
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            accounts: Mutex::new(Ok(Vec::new())),
            chain_id: Mutex::new(1),
            balances: Arc::default(),
            queued: Mutex::new(VecDeque::new()),
            issued: Mutex::new(Vec::new()),
            provider_error: Mutex::new(None),
            events,
            account_requests: AtomicUsize::new(0),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the accounts returned by authorization requests
    pub fn with_accounts<I, S>(self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.accounts.lock() = Ok(accounts.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the current chain
    pub fn with_chain_id(self, chain_id: u64) -> Self {
        *self.chain_id.lock() = chain_id;
        self
    }

    /// Sets the balance of `address` in wei
    pub fn with_balance(self, address: &str, wei: u128) -> Self {
        self.set_balance(address, wei);
        self
    }

    /// Wraps the host for use as a trait object
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Makes authorization requests fail with a user rejection
    pub fn reject_accounts(&self, message: &str) {
        *self.accounts.lock() = Err(WalletError::Rejected(message.to_string()));
    }

    /// Makes authorization requests return `accounts`
    pub fn set_accounts(&self, accounts: Vec<String>) {
        *self.accounts.lock() = Ok(accounts);
    }

    /// Sets the balance of `address` in wei for every handle built by this host
    pub fn set_balance(&self, address: &str, wei: u128) {
        self.balances.lock().insert(address.to_string(), wei);
    }

    /// Changes the chain without notifying
    pub fn set_chain_id(&self, chain_id: u64) {
        *self.chain_id.lock() = chain_id;
    }

    /// Makes provider construction fail with `error`, `None` to recover
    pub fn fail_provider(&self, error: Option<WalletError>) {
        *self.provider_error.lock() = error;
    }

    /// Queues a prepared handle for the next `provider()` call
    pub fn push_provider(&self, provider: Arc<MockProvider>) {
        self.queued.lock().push_back(provider);
    }

    /// Every handle handed out so far, oldest first
    pub fn providers(&self) -> Vec<Arc<MockProvider>> {
        self.issued.lock().clone()
    }

    /// The most recently handed out handle
    pub fn latest_provider(&self) -> Option<Arc<MockProvider>> {
        self.issued.lock().last().cloned()
    }

    /// Number of authorization requests made so far
    pub fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Number of subscriptions that were released
    pub fn released_subscriptions(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Pushes a notification to every subscriber
    pub fn emit(&self, event: HostEvent) {
        // No subscribers is not an error for a host.
        let _ = self.events.send(event);
    }

    /// Pushes an accounts-changed notification
    pub fn emit_accounts<I, S>(&self, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emit(HostEvent::AccountsChanged(
            accounts.into_iter().map(Into::into).collect(),
        ));
    }

    /// Switches to `chain_id` and pushes a chain-changed notification
    pub fn switch_chain(&self, chain_id: u64) {
        self.set_chain_id(chain_id);
        self.emit(HostEvent::ChainChanged(Some(chain_id)));
    }
}

#[async_trait]
impl HostWallet for MockHost {
    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        self.accounts.lock().clone()
    }

    fn subscribe(&self) -> HostEvents {
        let released = Arc::clone(&self.released);
        HostEvents::with_release(self.events.subscribe(), move || {
            released.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn provider(&self) -> WalletResult<Arc<dyn ProviderHandle>> {
        if let Some(err) = self.provider_error.lock().clone() {
            return Err(err);
        }
        let queued = self.queued.lock().pop_front();
        let provider = match queued {
            Some(provider) => provider,
            None => {
                let chain_id = *self.chain_id.lock();
                Arc::new(MockProvider::with_balance_table(
                    chain_id,
                    Arc::clone(&self.balances),
                ))
            }
        };
        self.issued.lock().push(Arc::clone(&provider));
        Ok(provider)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
