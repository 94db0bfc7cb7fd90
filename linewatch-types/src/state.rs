//! The externally visible connectivity snapshot.

use crate::{ErrorCategory, ProbeResult};

/// Point-in-time view of backend reachability.
///
/// Snapshots are replaced wholesale whenever a probe chain starts or
/// completes; consumers only ever read them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectivityState {
    /// True iff the most recent chain found a reachable endpoint.
    pub is_connected: bool,

    /// True while a probe chain is in flight.
    pub is_checking: bool,

    /// Classified, user-facing message for the last total failure.
    pub last_error: Option<String>,

    /// Category behind `last_error`.
    pub last_error_category: Option<ErrorCategory>,

    /// Unix timestamp in milliseconds of the last completed chain.
    pub last_checked_ms: Option<u64>,

    /// Attempts made by the most recent chain, in endpoint order.
    pub diagnostics: Vec<ProbeResult>,

    /// Number of chains completed since the monitor was created.
    pub retry_count: u64,
}

impl ConnectivityState {
    /// Optimistic snapshot used before the first chain completes.
    pub fn initial() -> Self {
        Self {
            is_connected: true,
            is_checking: true,
            last_error: None,
            last_error_category: None,
            last_checked_ms: None,
            diagnostics: Vec::new(),
            retry_count: 0,
        }
    }

    /// Attempts from the last chain that did not succeed.
    pub fn failed_attempts(&self) -> impl Iterator<Item = &ProbeResult> {
        self.diagnostics.iter().filter(|r| !r.is_success())
    }

    /// The attempt that confirmed reachability, if any.
    pub fn successful_attempt(&self) -> Option<&ProbeResult> {
        self.diagnostics.iter().find(|r| r.is_success())
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn initial_state_is_optimistic() {
        let state = ConnectivityState::default();
        assert!(state.is_connected);
        assert!(state.is_checking);
        assert!(state.last_error.is_none());
        assert!(state.last_checked_ms.is_none());
        assert_eq!(state.retry_count, 0);
    }

    #[test]
    fn successful_attempt_skips_failures() {
        let state = ConnectivityState {
            diagnostics: vec![
                ProbeResult::timed_out("/", Duration::from_secs(3), Duration::from_secs(3), "timeout"),
                ProbeResult::success("/scheduler/status", Duration::from_millis(20)),
            ],
            ..ConnectivityState::initial()
        };

        assert_eq!(state.failed_attempts().count(), 1);
        assert_eq!(
            state.successful_attempt().map(|r| r.endpoint.as_str()),
            Some("/scheduler/status")
        );
    }
}
