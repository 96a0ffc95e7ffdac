//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level / filter directive did not parse.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber was already installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}
