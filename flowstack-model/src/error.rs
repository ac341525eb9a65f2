//! Error types for the `flowstack-model` crate.

use thiserror::Error;

/// Errors that can occur when calling external providers.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A generation provider call failed.
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A web search call failed or timed out.
    #[error("Web search error: {message}")]
    WebSearch {
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for provider operations.
pub type Result<T> = std::result::Result<T, ModelError>;
