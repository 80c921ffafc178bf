//! Error types for the Reel backend client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the video-generation backend
///
/// Every variant is a transport-level failure from the caller's point of view:
/// the request did not produce a usable answer and may be retried later.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Backend returned a non-2xx status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The request could not be built (bad base url, bad artifact url)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if the request hit the client timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_timeout())
    }
}
