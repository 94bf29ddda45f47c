//! Error types for identity and bookmark backends

use thiserror::Error;

/// Backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// The operation needs a signed-in user
    #[error("Not signed in")]
    NotSignedIn,

    /// The auth context was used before `init` or after `teardown`
    #[error("Auth context is not initialized")]
    NotInitialized,

    /// Wrong email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-up for an email that is already registered
    #[error("An account already exists for {0}")]
    AccountExists(String),

    /// Local database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Transport-level error talking to the remote backend
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote backend answered with a non-success status
    #[error("Backend returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The remote backend answered with something we could not decode
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, BackendError>;
