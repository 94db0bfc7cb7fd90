//! # linewatch-types
//!
//! Core types shared by the backend reachability monitor and its consumers.
//!
//! The monitor probes a fixed list of health-check endpoints on the voice line
//! API and publishes a [`ConnectivityState`] snapshot. Each probe produces a
//! [`ProbeResult`]; failed chains are summarized with an [`ErrorCategory`].
//!
//! ## Features
//!
//! - `serde`: JSON serialization of results and snapshots (used by the CLI export)
//!
//! ## Example
//!
//! ```rust
//! use linewatch_types::{ConnectivityState, ProbeResult, ProbeStatus};
//! use std::time::Duration;
//!
//! let result = ProbeResult::success("/", Duration::from_millis(40));
//! assert_eq!(result.status, ProbeStatus::Success);
//! assert_eq!(result.response_time_ms, 40);
//!
//! // Consumers start from an optimistic snapshot until the first chain completes
//! let state = ConnectivityState::initial();
//! assert!(state.is_connected);
//! assert!(state.is_checking);
//! ```

mod category;
mod probe;
mod state;
mod time;

pub use category::ErrorCategory;
pub use probe::{ProbeResult, ProbeStatus};
pub use state::ConnectivityState;
pub use time::current_timestamp_ms;
