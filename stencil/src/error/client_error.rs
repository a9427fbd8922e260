//! Transport and client operation errors.

use thiserror::Error;

use super::ValidationError;

/// Errors raised by a [`Transport`](crate::Transport) implementation.
///
/// The runtime never talks to the network itself; these variants give
/// transport implementations a common vocabulary for their failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to establish a connection to the device.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request exceeded the transport's timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        duration_ms: u64,
    },

    /// Any other transport failure.
    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if the request may succeed when sent again.
    ///
    /// Retrying is left to the transport owner; generated clients never retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection(_))
    }
}

/// Errors returned by generated client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not complete the request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with a failure status.
    #[error("HTTP {http_status}: {message}")]
    Api {
        /// The HTTP status code returned.
        http_status: u16,
        /// Error message from the response.
        message: String,
    },

    /// The response payload did not match the generated model.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload was rejected before it was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A keyed lookup or singleton read returned no object.
    #[error("No object found at {path}")]
    NotFound {
        /// The path that was queried.
        path: String,
    },
}

impl ClientError {
    /// Returns the HTTP status code if the API answered with a failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { http_status, .. } => Some(*http_status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Returns `true` if the payload never left the process.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
