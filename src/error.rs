//! Error types for cache storage and remote data access
//!
//! Storage failures are mostly absorbed by the cache layer; remote failures
//! reach callers only for operations that have no offline fallback.

use thiserror::Error;

/// Errors raised by a durable key-value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem read/write failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be serialized or deserialized
    #[error("Storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be represented by this backend
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Application-level errors encoded in an otherwise successful response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The response carried an explicit error message (e.g. unknown symbol)
    #[error("{0}")]
    ErrorMessage(String),

    /// The response carried a rate-limit notice
    #[error("API call frequency limit reached. Please try again later. ({0})")]
    RateLimited(String),

    /// The response carried an informational notice instead of data
    #[error("API Information: {0}")]
    Information(String),
}

/// Errors returned by the stock data API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request could not complete
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP request completed with a non-success status
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    /// The remote source rejected the request at the application level
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Response body was not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Local persistence failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether the failure came from the transport layer rather than the payload
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::HttpStatus(_))
    }
}
