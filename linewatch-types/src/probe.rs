//! Outcome of a single health-check request.

use std::fmt;
use std::time::Duration;

use crate::current_timestamp_ms;

/// How a single probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProbeStatus {
    /// The endpoint answered with a 2xx response within the timeout.
    Success,
    /// The transport reported an error before the timeout elapsed.
    Failed,
    /// No usable answer within the timeout.
    Timeout,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeStatus::Success => "success",
            ProbeStatus::Failed => "failed",
            ProbeStatus::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// Result of probing one endpoint.
///
/// A successful result never carries an error detail, and a result is only
/// ever marked [`ProbeStatus::Timeout`] when its response time reached the
/// configured timeout. The constructors uphold both rules.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeResult {
    /// Endpoint path, e.g. `/scheduler/status`.
    pub endpoint: String,

    /// How the probe ended.
    pub status: ProbeStatus,

    /// Wall-clock time spent on the attempt, in milliseconds.
    pub response_time_ms: u64,

    /// Raw transport error text. Absent on success.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error_detail: Option<String>,

    /// Unix timestamp in milliseconds when the result was created.
    pub timestamp_ms: u64,
}

impl ProbeResult {
    /// A successful probe.
    pub fn success(endpoint: impl Into<String>, elapsed: Duration) -> Self {
        Self::new(endpoint.into(), ProbeStatus::Success, elapsed, None)
    }

    /// A probe that failed before its deadline.
    pub fn failed(
        endpoint: impl Into<String>,
        elapsed: Duration,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(
            endpoint.into(),
            ProbeStatus::Failed,
            elapsed,
            Some(detail.into()),
        )
    }

    /// A probe that ran out of time.
    ///
    /// `elapsed` is clamped up to `timeout` so the recorded latency never
    /// undercuts the deadline that was exceeded.
    pub fn timed_out(
        endpoint: impl Into<String>,
        elapsed: Duration,
        timeout: Duration,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(
            endpoint.into(),
            ProbeStatus::Timeout,
            elapsed.max(timeout),
            Some(detail.into()),
        )
    }

    fn new(
        endpoint: String,
        status: ProbeStatus,
        elapsed: Duration,
        error_detail: Option<String>,
    ) -> Self {
        Self {
            endpoint,
            status,
            response_time_ms: elapsed.as_millis() as u64,
            error_detail,
            timestamp_ms: current_timestamp_ms(),
        }
    }

    /// Whether the endpoint answered successfully.
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}
