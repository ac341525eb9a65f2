//! Per-workspace retrieval index.
//!
//! [`WorkspaceIndex`] is the public face of the vector store: it owns the
//! embedding provider and a [`VectorStore`] backend, maps workspace ids to
//! collection names, and caches which collections have been created. Each
//! workspace gets its own collection, so deleting or clearing one
//! workspace can never touch another's data.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::document::{IndexEntry, META_WORKSPACE_ID, ScoredEntry};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Derive the collection name for a workspace id.
///
/// Ids that are already filesystem-safe map to `workspace_{id}`. Anything
/// else is sanitized and suffixed with a digest of the original id, so two
/// distinct ids can never collide on the same collection.
fn collection_name(workspace_id: &str) -> String {
    let safe = !workspace_id.is_empty()
        && workspace_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if safe {
        return format!("workspace_{workspace_id}");
    }

    let sanitized: String = workspace_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let digest = Sha256::digest(workspace_id.as_bytes());
    let tag: String = digest[..4].iter().map(|b| format!("{b:02x}")).collect();
    format!("workspace_{sanitized}_{tag}")
}

/// A per-workspace vector index over an embedding provider and a store
/// backend.
///
/// Queries are embedded with the same provider used at ingest time, so
/// persisted vectors remain comparable across restarts.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use flowstack_rag::{FsVectorStore, HashingEmbedder, WorkspaceIndex};
///
/// let index = WorkspaceIndex::new(
///     Arc::new(HashingEmbedder::default()),
///     Arc::new(FsVectorStore::open("./vector_db")?),
/// );
/// let results = index.search("ws-1", "what is the refund policy?", 5).await?;
/// ```
pub struct WorkspaceIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    handles: RwLock<HashSet<String>>,
}

impl WorkspaceIndex {
    /// Create an index over the given embedder and store backend.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store, handles: RwLock::new(HashSet::new()) }
    }

    /// Return a reference to the embedding provider.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Ensure the workspace's collection exists, returning its name.
    ///
    /// Idempotent and safe to call redundantly: concurrent first access on
    /// the same workspace resolves to a single backing collection
    /// (redundant creates are no-ops at the backend).
    pub async fn get_or_create_collection(&self, workspace_id: &str) -> Result<String> {
        let name = collection_name(workspace_id);
        {
            let handles = self.handles.read().await;
            if handles.contains(&name) {
                return Ok(name);
            }
        }
        self.store.create_collection(&name, self.embedder.dimensions()).await?;
        self.handles.write().await.insert(name.clone());
        Ok(name)
    }

    /// Add documents with precomputed embeddings to a workspace.
    ///
    /// Generates one fresh uuid per text and returns the ids in input
    /// order. Metadata defaults to `{workspace_id}` when omitted. The
    /// write is a single backend upsert: on success all entries are
    /// queryable, on failure none are.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LengthMismatch`] if `embeddings` (or `metadata`
    /// when provided) does not match `texts` in length.
    pub async fn add_documents(
        &self,
        workspace_id: &str,
        texts: &[String],
        embeddings: &[Vec<f32>],
        metadata: Option<Vec<HashMap<String, String>>>,
    ) -> Result<Vec<String>> {
        if embeddings.len() != texts.len() {
            return Err(RagError::LengthMismatch {
                what: "embeddings",
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        if let Some(metadata) = &metadata {
            if metadata.len() != texts.len() {
                return Err(RagError::LengthMismatch {
                    what: "metadata",
                    expected: texts.len(),
                    actual: metadata.len(),
                });
            }
        }

        let collection = self.get_or_create_collection(workspace_id).await?;
        let ids: Vec<String> = texts.iter().map(|_| Uuid::new_v4().to_string()).collect();

        let entries: Vec<IndexEntry> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| IndexEntry {
                id: ids[i].clone(),
                text: text.clone(),
                embedding: embeddings[i].clone(),
                metadata: match &metadata {
                    Some(metadata) => metadata[i].clone(),
                    None => HashMap::from([(
                        META_WORKSPACE_ID.to_string(),
                        workspace_id.to_string(),
                    )]),
                },
            })
            .collect();

        self.store.upsert(&collection, &entries).await?;
        info!(workspace = workspace_id, count = entries.len(), "added documents");
        Ok(ids)
    }

    /// Embed `query` and return up to `top_k` nearest entries, closest
    /// first (ascending cosine distance).
    ///
    /// An empty or never-written workspace yields an empty `Vec`, the
    /// normal "no context" outcome rather than a failure.
    pub async fn search(
        &self,
        workspace_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredEntry>> {
        let collection = self.get_or_create_collection(workspace_id).await?;
        let embedding = self.embedder.embed(query).await?;
        let hits = self.store.search(&collection, &embedding, top_k).await?;
        Ok(hits
            .into_iter()
            .map(|hit| ScoredEntry {
                text: hit.entry.text,
                metadata: hit.entry.metadata,
                distance: 1.0 - hit.score,
            })
            .collect())
    }

    /// Fetch every entry stored for a workspace (full scan, no ranking).
    pub async fn fetch_all(&self, workspace_id: &str) -> Result<Vec<IndexEntry>> {
        let collection = self.get_or_create_collection(workspace_id).await?;
        self.store.fetch_all(&collection).await
    }

    /// Return the number of entries stored for a workspace.
    pub async fn count(&self, workspace_id: &str) -> Result<usize> {
        let collection = self.get_or_create_collection(workspace_id).await?;
        self.store.count(&collection).await
    }

    /// Remove all entries for a workspace, keeping the empty collection.
    pub async fn clear_collection(&self, workspace_id: &str) -> Result<()> {
        let collection = self.get_or_create_collection(workspace_id).await?;
        self.store.clear_collection(&collection).await?;
        info!(workspace = workspace_id, "cleared collection");
        Ok(())
    }

    /// Delete a workspace's collection and all its data.
    pub async fn delete_collection(&self, workspace_id: &str) -> Result<()> {
        let collection = collection_name(workspace_id);
        self.store.delete_collection(&collection).await?;
        self.handles.write().await.remove(&collection);
        info!(workspace = workspace_id, "deleted collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_ids_map_to_plain_names() {
        assert_eq!(collection_name("abc-123"), "workspace_abc-123");
        assert_eq!(collection_name("a_b"), "workspace_a_b");
    }

    #[test]
    fn unsafe_ids_get_a_digest_suffix() {
        let a = collection_name("a/b");
        let b = collection_name("a_b");
        assert_ne!(a, b);
        assert!(a.starts_with("workspace_a_b_"));
    }

    #[test]
    fn empty_id_is_still_namespaced() {
        assert!(collection_name("").starts_with("workspace_"));
    }
}
