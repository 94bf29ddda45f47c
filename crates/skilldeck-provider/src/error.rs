//! Error types for completion requests

use thiserror::Error;

/// Completion client errors
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No API key configured; the request was never sent
    #[error("No completion API key configured")]
    MissingCredential,

    /// Transport-level error (connection, TLS, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("Completion endpoint returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The response body could not be decoded
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    /// The response carried no assistant text
    #[error("Completion response contained no choices")]
    EmptyResponse,
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, CompletionError>;
