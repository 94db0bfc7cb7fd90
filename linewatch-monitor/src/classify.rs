//! Maps raw transport error text to an [`ErrorCategory`].
//!
//! Matching is by case-insensitive substring, so it depends on the wording
//! the transport produces. [`HttpTransport`](crate::HttpTransport) renders
//! errno-style codes (`ECONNREFUSED`, ...) into its errors for this reason.

use linewatch_types::ErrorCategory;

/// Needles per category, checked in priority order.
const PATTERNS: &[(ErrorCategory, &[&str])] = &[
    (ErrorCategory::ConnectionRefused, &["econnrefused"]),
    (ErrorCategory::HostNotFound, &["enotfound", "eai_again"]),
    (ErrorCategory::Timeout, &["etimedout", "timeout", "timed out"]),
    (ErrorCategory::ConnectionReset, &["econnreset"]),
    (ErrorCategory::HostUnreachable, &["ehostunreach"]),
    (ErrorCategory::NetworkUnreachable, &["enetunreach"]),
];

/// Classify a raw transport error.
///
/// `None` means no transport detail was available at all and yields
/// [`ErrorCategory::UnknownError`].
pub fn classify(raw: Option<&str>) -> ErrorCategory {
    let Some(raw) = raw else {
        return ErrorCategory::UnknownError;
    };

    let haystack = raw.to_lowercase();
    PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| haystack.contains(n)))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::GenericConnectionError)
}

/// Classify a raw transport error and render its user-facing message.
pub fn describe(raw: Option<&str>) -> String {
    classify(raw).message(raw)
}
