//! Error types for catalog loading

use thiserror::Error;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request for the catalog document never got a response
    #[error("Failed to fetch catalog from {location}: {reason}")]
    Fetch {
        /// URL or path of the document
        location: String,
        /// Failure reason
        reason: String,
    },

    /// The catalog server answered with a non-success status
    #[error("Catalog request to {location} returned HTTP {status}")]
    Status {
        /// URL of the document
        location: String,
        /// HTTP status code
        status: u16,
    },

    /// The document parsed but violates catalog invariants
    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
