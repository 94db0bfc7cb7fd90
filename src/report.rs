//! Human-readable and JSON renderings of monitor output.

use std::path::Path;

use anyhow::{Context, Result};
use linewatch_types::{current_timestamp_ms, ConnectivityState, ProbeResult, ProbeStatus};
use serde::Serialize;

use crate::duration::format_latency_ms;

/// One-line summary of a snapshot, printed by `watch` and `check`.
pub fn status_line(state: &ConnectivityState) -> String {
    if state.is_checking && state.last_checked_ms.is_none() {
        return "CHECKING      waiting for the first probe chain".to_string();
    }

    if state.is_connected {
        let via = state
            .successful_attempt()
            .map(|r| format!(" via {} in {}", r.endpoint, format_latency_ms(r.response_time_ms)))
            .unwrap_or_default();
        format!("CONNECTED     checks={}{}", state.retry_count, via)
    } else {
        format!(
            "DISCONNECTED  checks={} {}",
            state.retry_count,
            state.last_error.as_deref().unwrap_or("no error recorded")
        )
    }
}

/// Per-endpoint table of probe results.
pub fn diagnostics_table(results: &[ProbeResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.endpoint.len())
        .max()
        .unwrap_or(0)
        .max("ENDPOINT".len());

    let mut out = format!("{:<width$}  {:<8}  {:>8}  ERROR\n", "ENDPOINT", "STATUS", "LATENCY");
    for result in results {
        out.push_str(&format!(
            "{:<width$}  {:<8}  {:>8}  {}\n",
            result.endpoint,
            result.status.to_string(),
            format_latency_ms(result.response_time_ms),
            result.error_detail.as_deref().unwrap_or("-"),
        ));
    }
    out
}

/// Counts over a diagnostics sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub reachable: bool,
    pub fastest_ms: Option<u64>,
}

/// Exported result of `diagnose`.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub base_url: String,
    pub generated_at_ms: u64,
    pub summary: ReportSummary,
    pub results: Vec<ProbeResult>,
}

impl DiagnosticsReport {
    pub fn new(base_url: impl Into<String>, results: Vec<ProbeResult>) -> Self {
        let count = |status: ProbeStatus| results.iter().filter(|r| r.status == status).count();

        let summary = ReportSummary {
            total: results.len(),
            succeeded: count(ProbeStatus::Success),
            failed: count(ProbeStatus::Failed),
            timed_out: count(ProbeStatus::Timeout),
            reachable: results.iter().any(|r| r.is_success()),
            fastest_ms: results
                .iter()
                .filter(|r| r.is_success())
                .map(|r| r.response_time_ms)
                .min(),
        };

        Self {
            base_url: base_url.into(),
            generated_at_ms: current_timestamp_ms(),
            summary,
            results,
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }
}
