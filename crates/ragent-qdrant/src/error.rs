//! Vector store error types.

use thiserror::Error;

use crate::Distance;

/// Result type for vector store operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Vector store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Collection not found.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Vector dimension mismatch.
    #[error("dimension mismatch in '{collection}': expected {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    /// Distance metric mismatch on an existing collection.
    #[error("distance mismatch in '{collection}': expected {expected}, got {actual}")]
    DistanceMismatch {
        collection: String,
        expected: Distance,
        actual: Distance,
    },

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Creates a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a collection not found error.
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound(name.into())
    }

    /// Creates an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(collection: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            collection: collection.into(),
            expected,
            actual,
        }
    }

    /// Creates a distance mismatch error.
    pub fn distance_mismatch(
        collection: impl Into<String>,
        expected: Distance,
        actual: Distance,
    ) -> Self {
        Self::DistanceMismatch {
            collection: collection.into(),
            expected,
            actual,
        }
    }

    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Self::backend(err.to_string())
    }
}
