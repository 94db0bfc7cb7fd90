//! # linewatch-monitor
//!
//! Backend reachability monitor for the voice line console.
//!
//! The monitor continuously decides whether the voice line API is alive so
//! the rest of the application can gate network-dependent work behind a
//! single boolean. It never fails loudly: every probe failure becomes data
//! in the published [`ConnectivityState`].
//!
//! ## Architecture
//!
//! ```text
//! RetryScheduler (timer fires)
//!        │
//!        ▼
//! FallbackChain ──▶ ProbeExecutor ──▶ Transport   (×N endpoints, sequential)
//!        │
//!        ▼
//! classify (on total failure)
//!        │
//!        ▼
//! StatusStore (watch channel) ──▶ consumers
//! ```
//!
//! - **[`ProbeExecutor`]**: one bounded-timeout request, returned as a [`ProbeResult`]
//! - **[`FallbackChain`]**: endpoints in priority order, stopping at the first success
//! - **[`classify`]**: raw transport text to an [`ErrorCategory`]
//! - **[`RetryScheduler`]**: steady loop, fast loop and grace window
//! - **[`StatusStore`]**: the published snapshot
//! - **[`Monitor`]**: owns all of the above for the lifetime of the process
//!
//! ## Features
//!
//! - `http` (default): [`HttpTransport`] backed by reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linewatch_monitor::Monitor;
//!
//! # tokio_test::block_on(async {
//! let monitor = Monitor::builder()
//!     .base_url("http://localhost:8060")
//!     .spawn()
//!     .expect("valid configuration");
//!
//! let mut updates = monitor.subscribe();
//! while updates.changed().await.is_ok() {
//!     let state = updates.borrow_and_update().clone();
//!     println!("connected: {} (checks: {})", state.is_connected, state.retry_count);
//! }
//! # });
//! ```

mod chain;
mod classify;
mod config;
mod error;
mod monitor;
mod probe;
mod scheduler;
mod store;
mod transport;

#[cfg(test)]
mod test_support;

pub use chain::{ChainOutcome, FallbackChain, DEFAULT_ENDPOINTS};
pub use classify::{classify, describe};
pub use config::{
    Timings, DEFAULT_DIAGNOSTICS_TIMEOUT, DEFAULT_FAST_INTERVAL, DEFAULT_GRACE_WINDOW,
    DEFAULT_PROBE_TIMEOUT, DEFAULT_STEADY_INTERVAL,
};
pub use error::{MonitorError, TransportError};
pub use monitor::{Monitor, MonitorBuilder};
pub use probe::ProbeExecutor;
pub use scheduler::{RetryScheduler, SchedulerHandle, Timer};
pub use store::StatusStore;
pub use transport::{Transport, DEFAULT_BASE_URL};

#[cfg(feature = "http")]
pub use transport::{HttpTransport, HttpTransportBuilder};

// Re-export types for convenience
pub use linewatch_types::{ConnectivityState, ErrorCategory, ProbeResult, ProbeStatus};
