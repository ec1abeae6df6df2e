//! Host change notifications.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// A notification pushed by the host wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The set of authorized accounts changed. Empty means the user disconnected
    /// from the wallet side.
    AccountsChanged(Vec<String>),
    /// The active chain changed. `None` when the host did not report an id.
    ChainChanged(Option<u64>),
}

#[cfg(not(target_arch = "wasm32"))]
type ReleaseHook = Box<dyn FnOnce() + Send>;
#[cfg(target_arch = "wasm32")]
type ReleaseHook = Box<dyn FnOnce()>;

/// A live subscription to [`HostEvent`]s.
///
/// Dropping the subscription runs its release hook once, which lets hosts
/// detach listeners they registered for it.
pub struct HostEvents {
    receiver: broadcast::Receiver<HostEvent>,
    release: Option<ReleaseHook>,
}

impl HostEvents {
    /// Wraps a broadcast receiver with no release hook
    pub fn new(receiver: broadcast::Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            release: None,
        }
    }

    /// Wraps a broadcast receiver and runs `release` when dropped
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_release(
        receiver: broadcast::Receiver<HostEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Wraps a broadcast receiver and runs `release` when dropped
    #[cfg(target_arch = "wasm32")]
    pub fn with_release(
        receiver: broadcast::Receiver<HostEvent>,
        release: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the host has gone away. Events missed by a slow
    /// consumer are skipped.
    pub async fn next(&mut self) -> Option<HostEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already queued event without waiting
    pub fn try_next(&mut self) -> Option<HostEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl std::fmt::Debug for HostEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEvents")
            .field("queued", &self.receiver.len())
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

impl Drop for HostEvents {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
