//! # linewatch
//!
//! Reachability doctor for the voice line and radio manager API.
//!
//! The heavy lifting lives in [`linewatch_monitor`]; this crate adds what the
//! command-line tool needs around it:
//!
//! - **[`settings`]**: layered configuration (defaults, file, `LINEWATCH_*` env, CLI)
//! - **[`report`]**: status lines, diagnostics tables and JSON export
//! - **[`duration`]**: duration strings such as `"3s"` and `"500ms"`
//! - **[`logging`]**: tracing subscriber setup
//!
//! ## Usage
//!
//! ```bash
//! # Watch connectivity until Ctrl-C
//! linewatch --base-url http://localhost:8060 watch
//!
//! # One check, exit status 0 when reachable
//! linewatch check
//!
//! # Probe every endpoint and export the result
//! linewatch diagnose --export report.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use linewatch::settings::{Overrides, Settings};
//!
//! let settings = Settings::load(None, &Overrides::default()).unwrap();
//! let monitor = settings.monitor_builder().build().unwrap();
//! assert!(monitor.is_connected()); // optimistic until the first chain
//! ```

pub mod duration;
pub mod logging;
pub mod report;
pub mod settings;

pub use report::{diagnostics_table, status_line, DiagnosticsReport};
pub use settings::{Overrides, Settings};
