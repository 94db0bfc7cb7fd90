//! Probe executor: one bounded request against one endpoint.

use std::sync::Arc;
use std::time::Duration;

use linewatch_types::ProbeResult;
use tokio::time::Instant;
use tracing::debug;

use crate::transport::Transport;

/// Runs single probes through a [`Transport`].
///
/// [`ProbeExecutor::probe`] never fails: every transport error, and the
/// timeout itself, is returned as a [`ProbeResult`].
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    transport: Arc<dyn Transport>,
}

impl ProbeExecutor {
    /// Create an executor over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// The transport probes are issued through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Probe `endpoint`, giving up after `timeout`.
    ///
    /// An attempt that reaches `timeout`, whether the transport errored or
    /// even answered at that point, is recorded as a timeout.
    pub async fn probe(&self, endpoint: &str, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.transport.get(endpoint, timeout)).await;
        let elapsed = start.elapsed();

        let result = match outcome {
            Err(_) => ProbeResult::timed_out(
                endpoint,
                elapsed,
                timeout,
                format!("timeout of {}ms exceeded", timeout.as_millis()),
            ),
            Ok(Ok(())) if elapsed < timeout => ProbeResult::success(endpoint, elapsed),
            Ok(Ok(())) => ProbeResult::timed_out(
                endpoint,
                elapsed,
                timeout,
                format!("timeout of {}ms exceeded", timeout.as_millis()),
            ),
            Ok(Err(err)) if elapsed >= timeout => {
                ProbeResult::timed_out(endpoint, elapsed, timeout, err.to_string())
            }
            Ok(Err(err)) => ProbeResult::failed(endpoint, elapsed, err.to_string()),
        };

        debug!(
            endpoint,
            status = %result.status,
            response_time_ms = result.response_time_ms,
            "probe finished"
        );

        result
    }
}
