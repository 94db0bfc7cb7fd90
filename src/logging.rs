//! Tracing subscriber setup for the binary.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` (or `info`) applies.
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level.unwrap_or("info"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
