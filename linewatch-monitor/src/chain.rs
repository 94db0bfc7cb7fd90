//! Fallback chain: sequential probing over the endpoint priority list.

use std::sync::Arc;
use std::time::Duration;

use linewatch_types::ProbeResult;

use crate::probe::ProbeExecutor;

/// Default endpoint priority list, cheapest and most authoritative first.
pub const DEFAULT_ENDPOINTS: [&str; 3] = ["/", "/scheduler/status", "/lines"];

/// Result of one chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    /// True iff any attempt succeeded.
    pub reachable: bool,
    /// Attempts in endpoint order, ending at the first success.
    pub attempts: Vec<ProbeResult>,
}

impl ChainOutcome {
    /// Raw error of the first attempt.
    ///
    /// The first endpoint is treated as the most diagnostic, so this is what
    /// gets classified for the user even when later endpoints failed
    /// differently.
    pub fn first_error(&self) -> Option<&str> {
        self.attempts.first().and_then(|r| r.error_detail.as_deref())
    }
}

/// Tries endpoints in order until one answers.
///
/// Probes are issued strictly one after another. Each probe gets the full
/// per-call timeout; there is no chain-wide deadline.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    executor: ProbeExecutor,
    endpoints: Arc<[String]>,
    timeout: Duration,
}

impl FallbackChain {
    /// Create a chain over `endpoints` using `timeout` per probe.
    pub fn new(executor: ProbeExecutor, endpoints: Vec<String>, timeout: Duration) -> Self {
        Self {
            executor,
            endpoints: endpoints.into(),
            timeout,
        }
    }

    /// The executor probes are issued through.
    pub fn executor(&self) -> &ProbeExecutor {
        &self.executor
    }

    /// The endpoint priority list.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Per-probe timeout used by [`FallbackChain::run`].
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe endpoints in order, stopping at the first success.
    pub async fn run(&self) -> ChainOutcome {
        let mut attempts = Vec::with_capacity(self.endpoints.len());

        for endpoint in self.endpoints.iter() {
            let result = self.executor.probe(endpoint, self.timeout).await;
            let succeeded = result.is_success();
            attempts.push(result);
            if succeeded {
                return ChainOutcome {
                    reachable: true,
                    attempts,
                };
            }
        }

        ChainOutcome {
            reachable: false,
            attempts,
        }
    }

    /// Probe every endpoint, in order, with `timeout` per probe.
    ///
    /// Unlike [`FallbackChain::run`] this never stops early.
    pub async fn sweep(&self, timeout: Duration) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(self.endpoints.len());
        for endpoint in self.endpoints.iter() {
            results.push(self.executor.probe(endpoint, timeout).await);
        }
        results
    }
}
