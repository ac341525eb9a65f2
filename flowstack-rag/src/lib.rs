//! # flowstack-rag
//!
//! Per-workspace retrieval core for Flowstack: chunking, deterministic
//! embeddings, vector storage, and document ingestion.
//!
//! ## Overview
//!
//! Each user workflow owns an isolated *workspace*: a named vector
//! collection holding the chunks of every document uploaded to it. The
//! crate provides:
//!
//! - [`TextChunker`] — fixed-size sliding-window splitting with overlap
//! - [`HashingEmbedder`] — deterministic hash-projection embeddings
//! - [`VectorStore`] — backend trait with [`InMemoryVectorStore`] and the
//!   persistent [`FsVectorStore`]
//! - [`WorkspaceIndex`] — the per-workspace store: add, k-NN search,
//!   clear, delete
//! - [`IngestPipeline`] — chunk → embed → store for one document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flowstack_rag::{
//!     FsVectorStore, HashingEmbedder, IngestPipeline, TextChunker, WorkspaceIndex,
//! };
//!
//! let embedder = Arc::new(HashingEmbedder::default());
//! let store = Arc::new(FsVectorStore::open("./vector_db")?);
//! let index = Arc::new(WorkspaceIndex::new(embedder.clone(), store));
//!
//! let pipeline = IngestPipeline::builder()
//!     .chunker(Arc::new(TextChunker::default()))
//!     .embedder(embedder)
//!     .index(index.clone())
//!     .build()?;
//!
//! let receipt = pipeline.ingest(&text, "workspace-1", "handbook.pdf").await?;
//! let results = index.search("workspace-1", "vacation policy", 5).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod fsstore;
pub mod inmemory;
pub mod pipeline;
pub mod vectorstore;
pub mod workspace;

pub use chunking::{Chunker, TextChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{IndexEntry, META_FILENAME, META_WORKSPACE_ID, ScoredEntry, SearchHit};
pub use embedding::{DEFAULT_DIMENSIONS, EmbeddingProvider, HashingEmbedder};
pub use error::{RagError, Result};
pub use fsstore::FsVectorStore;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{IngestPipeline, IngestPipelineBuilder, IngestReceipt};
pub use vectorstore::VectorStore;
pub use workspace::WorkspaceIndex;
