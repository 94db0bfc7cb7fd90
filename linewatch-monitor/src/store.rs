//! Reactive status store.
//!
//! Holds the single [`ConnectivityState`] snapshot and publishes every change
//! through a watch channel. Writes replace the whole snapshot; concurrent
//! chains are last-write-wins.

use linewatch_types::{current_timestamp_ms, ConnectivityState, ErrorCategory};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::chain::ChainOutcome;
use crate::classify::classify;

/// Owner of the connectivity snapshot.
#[derive(Debug)]
pub struct StatusStore {
    sender: watch::Sender<ConnectivityState>,
}

impl StatusStore {
    /// Create a store holding the optimistic initial snapshot.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ConnectivityState::initial());
        Self { sender }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> ConnectivityState {
        self.sender.borrow().clone()
    }

    /// Whether the last committed chain reached the backend.
    pub fn is_connected(&self) -> bool {
        self.sender.borrow().is_connected
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.sender.subscribe()
    }

    /// Mark a chain as in flight.
    pub fn begin_check(&self) {
        self.sender.send_if_modified(|state| {
            let changed = !state.is_checking;
            state.is_checking = true;
            changed
        });
    }

    /// Commit a completed chain and return its reachability.
    pub fn commit(&self, outcome: ChainOutcome) -> bool {
        let reachable = outcome.reachable;

        self.sender.send_modify(|state| {
            let was_connected = state.is_connected;
            let retry_count = state.retry_count + 1;

            let (last_error, last_error_category) = if reachable {
                (None, None)
            } else {
                let raw = outcome.first_error();
                let category = classify(raw);
                (Some(category.message(raw)), Some(category))
            };

            match (was_connected, reachable) {
                (true, false) => warn!(
                    category = %last_error_category.unwrap_or(ErrorCategory::UnknownError),
                    error = last_error.as_deref().unwrap_or_default(),
                    attempts = outcome.attempts.len(),
                    "backend became unreachable"
                ),
                (false, true) => info!(
                    endpoint = outcome
                        .attempts
                        .last()
                        .map(|r| r.endpoint.as_str())
                        .unwrap_or_default(),
                    "backend reachable again"
                ),
                _ => {}
            }

            *state = ConnectivityState {
                is_connected: reachable,
                is_checking: false,
                last_error,
                last_error_category,
                last_checked_ms: Some(current_timestamp_ms()),
                diagnostics: outcome.attempts,
                retry_count,
            };
        });

        reachable
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}
