//! Timing configuration for probing and retries.

use std::time::Duration;

use crate::error::MonitorError;

/// Per-probe timeout for scheduled and manual checks.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);
/// Per-probe timeout for on-demand detailed diagnostics.
pub const DEFAULT_DIAGNOSTICS_TIMEOUT: Duration = Duration::from_secs(5);
/// Period of the always-on steady probe loop.
pub const DEFAULT_STEADY_INTERVAL: Duration = Duration::from_secs(30);
/// Period of the fast probe loop used while disconnected.
pub const DEFAULT_FAST_INTERVAL: Duration = Duration::from_secs(5);
/// How long after mount the fast loop stays armed.
pub const DEFAULT_GRACE_WINDOW: Duration = Duration::from_secs(60);

/// Timeouts and intervals used by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub probe_timeout: Duration,
    pub diagnostics_timeout: Duration,
    pub steady_interval: Duration,
    pub fast_interval: Duration,
    pub grace_window: Duration,
}

impl Timings {
    /// Reject zero durations.
    pub fn validate(&self) -> Result<(), MonitorError> {
        let fields = [
            ("probe_timeout", self.probe_timeout),
            ("diagnostics_timeout", self.diagnostics_timeout),
            ("steady_interval", self.steady_interval),
            ("fast_interval", self.fast_interval),
            ("grace_window", self.grace_window),
        ];

        for (name, value) in fields {
            if value.is_zero() {
                return Err(MonitorError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            diagnostics_timeout: DEFAULT_DIAGNOSTICS_TIMEOUT,
            steady_interval: DEFAULT_STEADY_INTERVAL,
            fast_interval: DEFAULT_FAST_INTERVAL,
            grace_window: DEFAULT_GRACE_WINDOW,
        }
    }
}
