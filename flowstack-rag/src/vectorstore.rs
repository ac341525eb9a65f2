//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{IndexEntry, SearchHit};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of [`IndexEntry`]s and support
/// upserting, deleting, and searching by vector similarity. Collections
/// are the isolation unit: operations on one collection never observe or
/// modify another.
///
/// # Example
///
/// ```rust,ignore
/// use flowstack_rag::{VectorStore, InMemoryVectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("workspace_abc", 384).await?;
/// store.upsert("workspace_abc", &entries).await?;
/// let hits = store.search("workspace_abc", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Remove all entries from a collection, keeping the empty collection.
    async fn clear_collection(&self, name: &str) -> Result<()>;

    /// Upsert entries into a collection. Entries must have embeddings set.
    async fn upsert(&self, collection: &str, entries: &[IndexEntry]) -> Result<()>;

    /// Search for the `top_k` most similar entries to the given embedding.
    ///
    /// Returns results ordered by descending similarity score. An empty
    /// collection yields an empty `Vec`, not an error.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>>;

    /// Fetch every entry in a collection (full scan, no ranking).
    async fn fetch_all(&self, collection: &str) -> Result<Vec<IndexEntry>>;

    /// Return the number of entries in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
