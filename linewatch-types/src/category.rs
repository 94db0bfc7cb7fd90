//! Coarse categories for transport failures.

use std::fmt;

/// Why the backend could not be reached, as far as the transport can tell.
///
/// Categories are derived from raw transport error text; they are never
/// raised as errors themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorCategory {
    /// Nothing is listening on the server port.
    ConnectionRefused,
    /// The server name could not be resolved.
    HostNotFound,
    /// No response within the deadline.
    Timeout,
    /// The peer closed the connection mid-request.
    ConnectionReset,
    /// No route to the server host.
    HostUnreachable,
    /// The local network is down.
    NetworkUnreachable,
    /// A transport error that matched none of the known categories.
    GenericConnectionError,
    /// No transport error text was available at all.
    UnknownError,
}

impl ErrorCategory {
    /// All categories in classification priority order.
    pub const ALL: [ErrorCategory; 8] = [
        ErrorCategory::ConnectionRefused,
        ErrorCategory::HostNotFound,
        ErrorCategory::Timeout,
        ErrorCategory::ConnectionReset,
        ErrorCategory::HostUnreachable,
        ErrorCategory::NetworkUnreachable,
        ErrorCategory::GenericConnectionError,
        ErrorCategory::UnknownError,
    ];

    /// User-facing explanation for this category.
    ///
    /// `raw` is only used by [`ErrorCategory::GenericConnectionError`], which
    /// echoes the transport's own message.
    pub fn message(&self, raw: Option<&str>) -> String {
        match self {
            ErrorCategory::ConnectionRefused => {
                "Connection refused: the server is not running or is not accepting connections"
                    .to_string()
            }
            ErrorCategory::HostNotFound => {
                "Host not found: check the server address".to_string()
            }
            ErrorCategory::Timeout => {
                "Connection timed out: the server did not respond in time".to_string()
            }
            ErrorCategory::ConnectionReset => {
                "Connection reset: the server closed the connection unexpectedly".to_string()
            }
            ErrorCategory::HostUnreachable => {
                "Host unreachable: there is no route to the server".to_string()
            }
            ErrorCategory::NetworkUnreachable => {
                "Network unreachable: check your network connection".to_string()
            }
            ErrorCategory::GenericConnectionError => {
                format!("Connection error: {}", raw.unwrap_or_default())
            }
            ErrorCategory::UnknownError => {
                "Unknown error occurred while connecting to the server".to_string()
            }
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::ConnectionRefused => "connection refused",
            ErrorCategory::HostNotFound => "host not found",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::ConnectionReset => "connection reset",
            ErrorCategory::HostUnreachable => "host unreachable",
            ErrorCategory::NetworkUnreachable => "network unreachable",
            ErrorCategory::GenericConnectionError => "connection error",
            ErrorCategory::UnknownError => "unknown error",
        };
        f.write_str(s)
    }
}
