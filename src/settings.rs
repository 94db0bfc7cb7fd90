//! Configuration loading for the doctor binary.
//!
//! Settings are layered: built-in defaults, an optional config file, then
//! `LINEWATCH_*` environment variables, then command-line overrides.
//!
//! ```toml
//! base_url = "http://192.168.1.20:8060"
//! endpoints = ["/", "/scheduler/status", "/lines"]
//! probe_timeout = "3s"
//! diagnostics_timeout = "5s"
//! steady_interval = "30s"
//! fast_interval = "5s"
//! grace_window = "60s"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use linewatch_monitor::{
    Monitor, MonitorBuilder, Timings, DEFAULT_BASE_URL, DEFAULT_DIAGNOSTICS_TIMEOUT,
    DEFAULT_ENDPOINTS, DEFAULT_FAST_INTERVAL, DEFAULT_GRACE_WINDOW, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_STEADY_INTERVAL,
};
use serde::Deserialize;

use crate::duration::{format_duration, parse_duration};

/// Environment variable prefix, e.g. `LINEWATCH_BASE_URL`.
pub const ENV_PREFIX: &str = "LINEWATCH";

/// Values given on the command line, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub probe_timeout: Option<String>,
}

/// Resolved monitor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub endpoints: Vec<String>,
    pub timings: Timings,
}

/// Settings as they appear in config sources.
#[derive(Debug, Deserialize)]
struct RawSettings {
    base_url: String,
    endpoints: Vec<String>,
    probe_timeout: String,
    diagnostics_timeout: String,
    steady_interval: String,
    fast_interval: String,
    grace_window: String,
}

impl Settings {
    /// Load settings from defaults, an optional file, the environment and `overrides`.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("endpoints", DEFAULT_ENDPOINTS.to_vec())?
            .set_default("probe_timeout", format_duration(DEFAULT_PROBE_TIMEOUT))?
            .set_default(
                "diagnostics_timeout",
                format_duration(DEFAULT_DIAGNOSTICS_TIMEOUT),
            )?
            .set_default("steady_interval", format_duration(DEFAULT_STEADY_INTERVAL))?
            .set_default("fast_interval", format_duration(DEFAULT_FAST_INTERVAL))?
            .set_default("grace_window", format_duration(DEFAULT_GRACE_WINDOW))?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("endpoints"),
            )
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("probe_timeout", overrides.probe_timeout.clone())?
            .build()
            .context("Failed to load configuration")?;

        let raw: RawSettings = config
            .try_deserialize()
            .context("Invalid configuration")?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let timing = |name: &str, value: &str| {
            parse_duration(value).with_context(|| format!("Invalid value for {}", name))
        };

        Ok(Self {
            base_url: raw.base_url,
            endpoints: raw.endpoints,
            timings: Timings {
                probe_timeout: timing("probe_timeout", &raw.probe_timeout)?,
                diagnostics_timeout: timing("diagnostics_timeout", &raw.diagnostics_timeout)?,
                steady_interval: timing("steady_interval", &raw.steady_interval)?,
                fast_interval: timing("fast_interval", &raw.fast_interval)?,
                grace_window: timing("grace_window", &raw.grace_window)?,
            },
        })
    }

    /// A monitor builder configured from these settings.
    pub fn monitor_builder(&self) -> MonitorBuilder {
        Monitor::builder()
            .base_url(self.base_url.clone())
            .endpoints(self.endpoints.clone())
            .timings(self.timings)
    }
}
