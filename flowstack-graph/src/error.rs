//! Error types for the `flowstack-graph` crate.

use thiserror::Error;

/// Errors that can occur while resolving or executing a workflow graph.
///
/// Graph misconfiguration errors (`NoOutputNode`, `DisconnectedOutput`,
/// `UnsupportedSourceType`) are never retried: the user must fix the
/// graph on the canvas.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The graph contains no output node.
    #[error("No output node found. Connect an output node to run.")]
    NoOutputNode,

    /// The output node has no incoming edges.
    #[error("Output node is not connected to any source.")]
    DisconnectedOutput,

    /// The node feeding the output node cannot drive execution.
    #[error("Unsupported source '{0}' connected to output")]
    UnsupportedSourceType(String),

    /// A node description carried a type string outside the closed set.
    #[error("Unknown node type '{0}'")]
    UnknownNodeType(String),

    /// The node/edge description failed structural decoding.
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    /// The document registry lookup failed.
    #[error("Document registry error: {0}")]
    Registry(String),

    /// An error propagated from the retrieval core.
    #[error(transparent)]
    Rag(#[from] flowstack_rag::RagError),
}

/// A convenience result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
