//! # flowstack-graph
//!
//! Workflow graph resolution and execution for Flowstack.
//!
//! ## Overview
//!
//! A workflow is a directed graph of typed nodes drawn on a canvas:
//! `userQuery`, `knowledgeBase`, `llmEngine`, and `output`. Execution
//! resolves the single active path ending at the first output node and
//! dispatches on the type of the node feeding it:
//!
//! - **userQuery** — echo the query verbatim
//! - **knowledgeBase** — return the workspace's top-k matching chunks
//! - **llmEngine** — gather knowledge-base context (plus optional web
//!   search results), assemble a prompt, and call the configured
//!   generation provider
//!
//! Every execution returns a structured [`ExecutionResult`] with the
//! response, the provenance (`context_used`), the provider and model
//! actually used, and wall-clock timing. The engine boundary is
//! infallible: misconfigured graphs and storage failures come back as
//! `success == false`, not as errors or panics.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flowstack_graph::{ExecutionEngine, InMemoryDocumentRegistry, WorkflowGraph};
//! use flowstack_model::{ProviderRegistry, SerpApiClient};
//!
//! let engine = ExecutionEngine::builder()
//!     .index(index)
//!     .registry(Arc::new(InMemoryDocumentRegistry::new()))
//!     .providers(ProviderRegistry::with_defaults())
//!     .web_search(Arc::new(SerpApiClient::new()))
//!     .build()?;
//!
//! let graph: WorkflowGraph = serde_json::from_value(canvas_json)?;
//! let result = engine.execute(&graph, "workspace-1", "What is our refund policy?").await;
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod schema;

pub use engine::{ExecutionEngine, ExecutionEngineBuilder, ExecutionResult};
pub use error::{GraphError, Result};
pub use registry::{DocumentRegistry, InMemoryDocumentRegistry};
pub use resolver::{ResolvedPath, resolve};
pub use schema::{GraphEdge, GraphNode, LlmEngineConfig, NodeKind, WorkflowGraph};
