use std::io;
use std::time::Duration;

use thiserror::Error as ThisError;

use crate::config::Endpoint;
use crate::frame::{self, Frame};

/// Every failure a client call can surface.
///
/// Server-reported errors are ordinary replies and leave the connection usable. Everything that
/// happens at the transport or framing level poisons the connection, see
/// [`Error::is_connection_fatal`].
#[derive(Debug, ThisError)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Connect
    // -------------------------------------------------------------------------
    #[error("could not connect to {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },

    #[error("connecting to {endpoint} timed out after {timeout:?}")]
    ConnectTimeout { endpoint: Endpoint, timeout: Duration },

    // -------------------------------------------------------------------------
    // Exchange
    // -------------------------------------------------------------------------
    #[error("protocol error: {0}")]
    Protocol(#[from] frame::Error),

    #[error("network error: {0}")]
    Network(#[from] io::Error),

    #[error("no reply received within {0:?}")]
    ReadTimeout(Duration),

    #[error("connection closed by the server")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Replies
    // -------------------------------------------------------------------------
    #[error("server error: {0}")]
    Server(String),

    #[error("unexpected response, expected {expected}, got {actual}")]
    UnexpectedResponse { expected: String, actual: Frame },

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the connection that produced this error can no longer be trusted and has been
    /// closed.
    pub fn is_connection_fatal(&self) -> bool {
        !matches!(
            self,
            Error::Server(_) | Error::UnexpectedResponse { .. } | Error::Config(_)
        )
    }

    /// The literal message of a server-reported error.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Server(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_keep_the_connection() {
        let err = Error::Server("ERR value is not an integer or out of range".to_string());

        assert!(!err.is_connection_fatal());
        assert_eq!(
            err.server_message(),
            Some("ERR value is not an integer or out of range")
        );
    }

    #[test]
    fn transport_errors_poison_the_connection() {
        let errors = vec![
            Error::Network(io::Error::from(io::ErrorKind::BrokenPipe)),
            Error::Protocol(frame::Error::InvalidDataType(b'?')),
            Error::ReadTimeout(Duration::from_millis(10)),
            Error::ConnectionClosed,
        ];

        for err in errors {
            assert!(err.is_connection_fatal(), "{} should be fatal", err);
            assert_eq!(err.server_message(), None);
        }
    }

    #[test]
    fn display_includes_the_endpoint() {
        let err = Error::ConnectTimeout {
            endpoint: Endpoint::HostPort {
                host: "10.0.0.1".to_string(),
                port: 6379,
            },
            timeout: Duration::from_secs(1),
        };

        assert_eq!(err.to_string(), "connecting to 10.0.0.1:6379 timed out after 1s");
    }
}
