//! Error types for the `flowstack-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The backing storage medium could not be opened or created.
    #[error("Storage unavailable at '{path}': {message}")]
    StorageUnavailable {
        /// The filesystem path that could not be opened.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Persisted data failed structural decoding and the one-shot
    /// reset-and-retry recovery also failed.
    #[error("Storage corrupt: {message}")]
    StorageCorrupt {
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    Backend {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Parallel input slices passed to a store operation have different lengths.
    #[error("Length mismatch: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// The input slice whose length is inconsistent.
        what: &'static str,
        /// The number of entries the operation expected.
        expected: usize,
        /// The number of entries actually supplied.
        actual: usize,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
