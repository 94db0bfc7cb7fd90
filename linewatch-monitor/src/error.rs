//! Error types for the monitor.
//!
//! Probe failures are never reported through these types; they are captured
//! as [`ProbeResult`](linewatch_types::ProbeResult) data. [`TransportError`]
//! only travels between a [`Transport`](crate::Transport) and the probe
//! executor, and [`MonitorError`] covers construction and gating.

use thiserror::Error;

/// Errors a transport can report for a single request.
///
/// The rendered text is what ends up in `ProbeResult::error_detail` and is
/// what the classifier matches against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Socket-level failure, tagged with its errno-style code.
    #[error("{code} {url}: {message}")]
    Network {
        code: &'static str,
        url: String,
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// Anything the transport could not attribute to a known cause.
    #[error("{0}")]
    Other(String),
}

/// Errors from building or gating on a monitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// A builder setting was out of range.
    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(String),

    /// No transport was supplied and the `http` feature is disabled.
    #[error("No transport configured")]
    MissingTransport,

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The backend was not reachable when work was gated on it.
    #[error("Backend is not reachable: {}", .0.as_deref().unwrap_or("no check has failed yet"))]
    Disconnected(Option<String>),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return TransportError::Status(status.as_u16());
        }

        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        match network_code(&err) {
            Some(code) => TransportError::Network {
                code,
                url,
                message: error_chain(&err),
            },
            None => TransportError::Other(error_chain(&err)),
        }
    }
}

/// Find the errno-style code for a reqwest failure by walking its sources.
#[cfg(feature = "http")]
fn network_code(err: &reqwest::Error) -> Option<&'static str> {
    use std::error::Error as _;
    use std::io::ErrorKind;

    if err.is_timeout() {
        return Some("ETIMEDOUT");
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            match io.kind() {
                ErrorKind::ConnectionRefused => return Some("ECONNREFUSED"),
                ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                    return Some("ECONNRESET")
                }
                ErrorKind::HostUnreachable => return Some("EHOSTUNREACH"),
                ErrorKind::NetworkUnreachable => return Some("ENETUNREACH"),
                ErrorKind::TimedOut => return Some("ETIMEDOUT"),
                _ => {}
            }
        }
        // hyper-util reports resolver failures as "dns error: ..."
        if cause.to_string().contains("dns error") {
            return Some("ENOTFOUND");
        }
        source = cause.source();
    }

    None
}

/// Flatten an error and its sources into one line.
#[cfg(feature = "http")]
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
