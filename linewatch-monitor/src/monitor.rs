//! The [`Monitor`] facade and its builder.

use std::sync::Arc;
use std::time::Duration;

use linewatch_types::{ConnectivityState, ProbeResult};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::info;

use crate::chain::{FallbackChain, DEFAULT_ENDPOINTS};
use crate::config::Timings;
use crate::error::MonitorError;
use crate::probe::ProbeExecutor;
use crate::scheduler::{RetryScheduler, SchedulerHandle};
use crate::store::StatusStore;
use crate::transport::Transport;

/// Backend reachability monitor.
///
/// Owns the status store and the retry scheduler. Create one per process and
/// hand out clones of the [`Arc`] (or receivers from [`Monitor::subscribe`])
/// to consumers. Timers run between [`Monitor::start`] and
/// [`Monitor::stop`], and stop when the monitor is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use linewatch_monitor::Monitor;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let monitor = Monitor::builder()
///         .base_url("http://localhost:8060")
///         .spawn()?;
///
///     if monitor.retry_connection().await {
///         println!("backend is up");
///     } else {
///         println!("backend is down: {:?}", monitor.last_error());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Monitor {
    store: Arc<StatusStore>,
    scheduler: Arc<RetryScheduler>,
    timings: Timings,
    handle: Mutex<Option<SchedulerHandle>>,
}

impl Monitor {
    /// Create a new builder for configuring the monitor.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }

    /// Arm the timers and run the initial chain.
    ///
    /// Returns `false` if the monitor was already running. Must be called
    /// from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return false;
        }
        let chain = self.scheduler.chain();
        info!(
            backend = chain.executor().transport().description(),
            endpoints = chain.endpoints().join(","),
            probe_timeout_ms = chain.timeout().as_millis() as u64,
            "starting reachability monitor"
        );
        *handle = Some(self.scheduler.start());
        true
    }

    /// Disarm all timers. Returns `false` if the monitor was not running.
    pub fn stop(&self) -> bool {
        match self.handle.lock().take() {
            Some(handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Whether the timers are armed.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Current snapshot.
    pub fn state(&self) -> ConnectivityState {
        self.store.snapshot()
    }

    /// Receiver that observes every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.store.subscribe()
    }

    /// Whether the last committed chain reached the backend.
    pub fn is_connected(&self) -> bool {
        self.store.is_connected()
    }

    /// Whether a chain is currently in flight.
    pub fn is_checking(&self) -> bool {
        self.store.snapshot().is_checking
    }

    /// User-facing message for the last failure, cleared on success.
    pub fn last_error(&self) -> Option<String> {
        self.store.snapshot().last_error
    }

    /// Unix-ms time of the last committed chain.
    pub fn last_checked_ms(&self) -> Option<u64> {
        self.store.snapshot().last_checked_ms
    }

    /// Probe results from the last committed chain.
    pub fn diagnostics(&self) -> Vec<ProbeResult> {
        self.store.snapshot().diagnostics
    }

    /// Number of chains committed since construction.
    pub fn retry_count(&self) -> u64 {
        self.store.snapshot().retry_count
    }

    /// Run one chain out of band and return whether the backend is reachable.
    ///
    /// The timers are neither reset nor rescheduled.
    pub async fn retry_connection(&self) -> bool {
        self.scheduler.run_chain().await
    }

    /// Probe every endpoint with the longer diagnostics timeout.
    ///
    /// The result is for display only; the status store is not touched.
    pub async fn detailed_diagnostics(&self) -> Vec<ProbeResult> {
        self.scheduler
            .chain()
            .sweep(self.timings.diagnostics_timeout)
            .await
    }

    /// Fail fast when the last chain could not reach the backend.
    ///
    /// Use this to gate network-dependent work such as loading settings.
    pub fn ensure_connected(&self) -> Result<(), MonitorError> {
        let state = self.store.snapshot();
        if state.is_connected {
            Ok(())
        } else {
            Err(MonitorError::Disconnected(state.last_error))
        }
    }

    /// Wait until a chain reports the backend reachable.
    pub async fn wait_until_connected(&self) -> ConnectivityState {
        let mut rx = self.store.subscribe();
        // The store owns the sender, so the channel cannot close while we wait
        let state = match rx.wait_for(|state| state.is_connected).await {
            Ok(state) => state.clone(),
            Err(_) => self.store.snapshot(),
        };
        state
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Builder for [`Monitor`].
#[derive(Debug, Default)]
pub struct MonitorBuilder {
    base_url: Option<String>,
    endpoints: Option<Vec<String>>,
    transport: Option<Arc<dyn Transport>>,
    timings: Timings,
}

impl MonitorBuilder {
    /// Set the API base URL used by the default HTTP transport.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the endpoint priority list (default: `/`, `/scheduler/status`, `/lines`).
    pub fn endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = Some(endpoints.into_iter().map(Into::into).collect());
        self
    }

    /// Use a custom transport instead of the HTTP one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace all timings at once.
    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Per-probe timeout for scheduled and manual checks (default: 3s).
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.timings.probe_timeout = timeout;
        self
    }

    /// Per-probe timeout for detailed diagnostics (default: 5s).
    pub fn diagnostics_timeout(mut self, timeout: Duration) -> Self {
        self.timings.diagnostics_timeout = timeout;
        self
    }

    /// Steady loop period (default: 30s).
    pub fn steady_interval(mut self, interval: Duration) -> Self {
        self.timings.steady_interval = interval;
        self
    }

    /// Fast loop period (default: 5s).
    pub fn fast_interval(mut self, interval: Duration) -> Self {
        self.timings.fast_interval = interval;
        self
    }

    /// How long after start the fast loop stays armed (default: 60s).
    pub fn grace_window(mut self, window: Duration) -> Self {
        self.timings.grace_window = window;
        self
    }

    /// Build an idle monitor.
    pub fn build(self) -> Result<Monitor, MonitorError> {
        self.timings.validate()?;

        let endpoints = self
            .endpoints
            .unwrap_or_else(|| DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect());
        validate_endpoints(&endpoints)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(self.base_url)?,
        };

        let store = Arc::new(StatusStore::new());
        let chain = FallbackChain::new(
            ProbeExecutor::new(transport),
            endpoints,
            self.timings.probe_timeout,
        );
        let scheduler = Arc::new(RetryScheduler::new(chain, store.clone(), self.timings));

        Ok(Monitor {
            store,
            scheduler,
            timings: self.timings,
            handle: Mutex::new(None),
        })
    }

    /// Build the monitor and start its timers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> Result<Monitor, MonitorError> {
        let monitor = self.build()?;
        monitor.start();
        Ok(monitor)
    }
}

fn validate_endpoints(endpoints: &[String]) -> Result<(), MonitorError> {
    if endpoints.is_empty() {
        return Err(MonitorError::InvalidConfig(
            "at least one endpoint is required".to_string(),
        ));
    }
    if let Some(bad) = endpoints.iter().find(|e| !e.starts_with('/')) {
        return Err(MonitorError::InvalidConfig(format!(
            "endpoint '{}' must start with '/'",
            bad
        )));
    }
    Ok(())
}

#[cfg(feature = "http")]
fn default_transport(base_url: Option<String>) -> Result<Arc<dyn Transport>, MonitorError> {
    let mut builder = crate::transport::HttpTransport::builder();
    if let Some(base_url) = base_url {
        builder = builder.base_url(base_url);
    }
    Ok(Arc::new(builder.build()?))
}

#[cfg(not(feature = "http"))]
fn default_transport(_base_url: Option<String>) -> Result<Arc<dyn Transport>, MonitorError> {
    Err(MonitorError::MissingTransport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, ScriptedTransport};
    use linewatch_types::ProbeStatus;

    fn monitor(transport: Arc<ScriptedTransport>) -> Monitor {
        Monitor::builder().transport(transport).build().unwrap()
    }

    #[test]
    fn builder_rejects_empty_endpoint_list() {
        let err = Monitor::builder()
            .transport(Arc::new(ScriptedTransport::new()))
            .endpoints(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_relative_endpoint() {
        let err = Monitor::builder()
            .transport(Arc::new(ScriptedTransport::new()))
            .endpoints(["/", "lines"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            MonitorError::InvalidConfig("endpoint 'lines' must start with '/'".to_string())
        );
    }

    #[test]
    fn builder_rejects_zero_timeout() {
        let err = Monitor::builder()
            .transport(Arc::new(ScriptedTransport::new()))
            .probe_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }

    #[test]
    fn new_monitor_is_idle_and_optimistic() {
        let monitor = monitor(Arc::new(ScriptedTransport::new()));
        assert!(!monitor.is_running());
        assert!(monitor.is_connected());
        assert!(monitor.is_checking());
        assert_eq!(monitor.retry_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_scenario() {
        let transport = Arc::new(ScriptedTransport::new().reply("/", Reply::ok_after(40)));
        let monitor = monitor(transport.clone());

        assert!(monitor.retry_connection().await);

        let diagnostics = monitor.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].endpoint, "/");
        assert_eq!(diagnostics[0].status, ProbeStatus::Success);
        assert_eq!(diagnostics[0].response_time_ms, 40);
        assert!(monitor.is_connected());
        assert_eq!(transport.call_count("/scheduler/status"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_then_success_scenario() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("/", Reply::Hang)
                .reply("/scheduler/status", Reply::ok_after(20)),
        );
        let monitor = monitor(transport);

        assert!(monitor.retry_connection().await);

        let state = monitor.state();
        assert!(state.is_connected);
        assert_eq!(state.diagnostics.len(), 2);
        assert_eq!(state.diagnostics[0].status, ProbeStatus::Timeout);
        assert_eq!(state.diagnostics[0].response_time_ms, 3_000);
        assert!(state.last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn total_failure_scenario() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("/", Reply::err("Network Error"))
                .reply("/scheduler/status", Reply::err("Network Error"))
                .reply("/lines", Reply::err("Network Error")),
        );
        let monitor = monitor(transport);

        assert!(!monitor.retry_connection().await);

        let state = monitor.state();
        assert!(!state.is_connected);
        assert_eq!(state.last_error.as_deref(), Some("Connection error: Network Error"));
        assert_eq!(state.diagnostics.len(), 3);
        assert_eq!(state.retry_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_anywhere_in_list_means_connected() {
        for position in 0..3 {
            let endpoints = ["/", "/scheduler/status", "/lines"];
            let transport = ScriptedTransport::new();
            for (i, endpoint) in endpoints.iter().enumerate() {
                let reply = if i == position {
                    Reply::ok()
                } else {
                    Reply::err("read ECONNRESET")
                };
                transport.set(endpoint, reply);
            }
            let monitor = monitor(Arc::new(transport));

            assert!(monitor.retry_connection().await, "success at {}", position);
            assert_eq!(monitor.diagnostics().len(), position + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn detailed_diagnostics_sweeps_without_touching_state() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("/", Reply::ok())
                .reply("/scheduler/status", Reply::ok_after(4_000))
                .reply("/lines", Reply::ok()),
        );
        let monitor = monitor(transport.clone());
        let before = monitor.state();

        let results = monitor.detailed_diagnostics().await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_success()));
        assert_eq!(monitor.state(), before);
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_retry_counts_alongside_timers() {
        let transport = Arc::new(ScriptedTransport::new().reply("/", Reply::ok()));
        let monitor = monitor(transport);
        assert!(monitor.start());
        assert!(!monitor.start());
        assert!(monitor.is_running());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(monitor.retry_count(), 1);

        monitor.retry_connection().await;
        monitor.retry_connection().await;
        assert_eq!(monitor.retry_count(), 3);

        // steady tick still lands at 30s from start
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(monitor.retry_count(), 4);

        assert!(monitor.stop());
        assert!(!monitor.stop());
        assert!(!monitor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn gating_follows_connectivity() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("/", Reply::err("connect ECONNREFUSED 127.0.0.1:8060"))
                .reply("/scheduler/status", Reply::err("ECONNREFUSED"))
                .reply("/lines", Reply::err("ECONNREFUSED")),
        );
        let monitor = Arc::new(monitor(transport.clone()));

        assert!(monitor.ensure_connected().is_ok());
        monitor.retry_connection().await;
        assert!(matches!(
            monitor.ensure_connected(),
            Err(MonitorError::Disconnected(Some(_)))
        ));

        let waiter = {
            let monitor = monitor.clone();
            tokio::spawn(async move { monitor.wait_until_connected().await })
        };

        transport.set("/", Reply::ok());
        monitor.retry_connection().await;

        let state = waiter.await.unwrap();
        assert!(state.is_connected);
        assert!(monitor.ensure_connected().is_ok());
    }
}
