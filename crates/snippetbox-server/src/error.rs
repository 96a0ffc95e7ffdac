//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that stop the server from serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a socket address.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// Failed to bind to the configured address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let source = "nowhere".parse::<SocketAddr>().unwrap_err();
        let err = ServerError::InvalidAddress {
            addr: "nowhere".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid address 'nowhere'"));

        let err = ServerError::Bind {
            addr: "127.0.0.1:4000".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(err.to_string(), "failed to bind to 127.0.0.1:4000: in use");
    }
}
