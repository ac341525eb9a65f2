//! Document ingestion pipeline.
//!
//! The [`IngestPipeline`] coordinates the ingest workflow for one
//! uploaded document: chunk the extracted text, embed each chunk, and
//! store the results in the workspace's collection tagged with the source
//! document's name.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::chunking::{Chunker, TextChunker};
use crate::config::RagConfig;
use crate::document::{META_FILENAME, META_WORKSPACE_ID};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::workspace::WorkspaceIndex;

/// The outcome of a successful ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Number of chunks produced and stored.
    pub chunk_count: usize,
    /// Ids of the stored entries, in chunk order.
    pub ids: Vec<String>,
}

/// The document ingestion orchestrator: chunk → embed → store.
///
/// Construct one via [`IngestPipeline::builder()`]. The embedding provider
/// should be the same instance the [`WorkspaceIndex`] embeds queries with.
pub struct IngestPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<WorkspaceIndex>,
}

impl std::fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IngestPipeline {
    /// Create a new [`IngestPipelineBuilder`].
    pub fn builder() -> IngestPipelineBuilder {
        IngestPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the workspace index.
    pub fn index(&self) -> &Arc<WorkspaceIndex> {
        &self.index
    }

    /// Ingest one document's extracted text into a workspace.
    ///
    /// Every stored chunk is tagged with the workspace id and
    /// `source_label` (the uploaded document's filename). Text that
    /// extracted to zero characters produces a zero-chunk receipt rather
    /// than an error; callers decide whether an empty result matters.
    ///
    /// # Errors
    ///
    /// Embedding or storage failures abort the whole ingest and propagate
    /// as-is; no partially stored chunks remain visible to readers.
    pub async fn ingest(
        &self,
        raw_text: &str,
        workspace_id: &str,
        source_label: &str,
    ) -> Result<IngestReceipt> {
        let chunks = self.chunker.chunk(raw_text);
        if chunks.is_empty() {
            info!(workspace = workspace_id, source = source_label, "ingested document (empty)");
            return Ok(IngestReceipt { chunk_count: 0, ids: Vec::new() });
        }

        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(source = source_label, error = %e, "embedding failed during ingestion");
            e
        })?;

        let metadata: Vec<HashMap<String, String>> = chunks
            .iter()
            .map(|_| {
                HashMap::from([
                    (META_WORKSPACE_ID.to_string(), workspace_id.to_string()),
                    (META_FILENAME.to_string(), source_label.to_string()),
                ])
            })
            .collect();

        let ids = self
            .index
            .add_documents(workspace_id, &chunks, &embeddings, Some(metadata))
            .await
            .map_err(|e| {
                error!(source = source_label, error = %e, "store failed during ingestion");
                e
            })?;

        let chunk_count = chunks.len();
        info!(workspace = workspace_id, source = source_label, chunk_count, "ingested document");

        Ok(IngestReceipt { chunk_count, ids })
    }
}

/// Builder for constructing an [`IngestPipeline`].
///
/// `embedder` and `index` are required. The chunker defaults to a
/// [`TextChunker`] sized from the configuration; the configuration
/// defaults to [`RagConfig::default()`].
#[derive(Default)]
pub struct IngestPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<WorkspaceIndex>>,
}

impl IngestPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker, overriding the config-derived default.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the workspace index to store into.
    pub fn index(mut self, index: Arc<WorkspaceIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`IngestPipeline`], validating that required fields are
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `embedder` or `index` is missing,
    /// or if the configured chunk window is invalid.
    pub fn build(self) -> Result<IngestPipeline> {
        let config = self.config.unwrap_or_default();
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(TextChunker::new(config.chunk_size, config.chunk_overlap)?),
        };
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;
        Ok(IngestPipeline { config, chunker, embedder, index })
    }
}
