//! Structured logging for Snippetbox.
//!
//! - [`init_logging`] installs the process-wide `tracing` subscriber (JSON in
//!   production, pretty or compact for development).
//! - [`capture`] records events into memory so tests can assert on them.

#![doc(html_root_url = "https://docs.rs/snippetbox-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod capture;
mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
