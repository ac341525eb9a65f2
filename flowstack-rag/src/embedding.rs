//! Embedding providers for generating vector embeddings from text.
//!
//! The [`EmbeddingProvider`] trait abstracts over embedding backends. The
//! crate ships [`HashingEmbedder`], a deterministic hash-projection
//! embedder: the same text always produces the same vector, across calls
//! and across process restarts, so persisted vectors remain valid and
//! re-querying is reproducible. Embedding *quality* is not a correctness
//! property here; only determinism, fixed dimension, and unit norm are.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::{RagError, Result};

/// The default embedding dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 384;

/// A provider that generates vector embeddings from text input.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// implementation calls [`embed`](EmbeddingProvider::embed) sequentially;
/// backends that support native batching should override it.
///
/// Query-time embedding must use the same provider (same algorithm, same
/// dimension) as ingest-time embedding.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Returns one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// A deterministic hash-projection embedder.
///
/// Each lowercased alphanumeric token is SHA-256-hashed; the digest selects
/// a bucket and a sign, and token frequencies accumulate into the bucket.
/// The resulting vector is L2-normalized. Text with no tokens (empty or
/// punctuation-only) maps to the all-zero vector, the well-defined
/// fallback when normalization is undefined.
///
/// # Example
///
/// ```rust,ignore
/// use flowstack_rag::{EmbeddingProvider, HashingEmbedder};
///
/// let embedder = HashingEmbedder::default();
/// let v = embedder.embed("hello world").await?;
/// assert_eq!(v.len(), embedder.dimensions());
/// ```
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    /// Create a new embedder with the given dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::Config("dimensions must be greater than zero".to_string()));
        }
        Ok(Self { dimensions })
    }

    /// Embed a single text synchronously.
    ///
    /// This is the whole algorithm; the async trait methods delegate here.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            let digest = Sha256::digest(token.as_bytes());
            let bucket = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
                as usize
                % self.dimensions;
            let sign = if digest[4] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

impl Default for HashingEmbedder {
    /// A 384-dimensional embedder.
    fn default() -> Self {
        Self { dimensions: DEFAULT_DIMENSIONS }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
