//! Data types for index entries and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key recording the workspace an entry belongs to.
pub const META_WORKSPACE_ID: &str = "workspace_id";

/// Metadata key recording the source document an entry was chunked from.
pub const META_FILENAME: &str = "filename";

/// A stored tuple of text, embedding, and metadata inside a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// Unique identifier within the collection.
    pub id: String,
    /// The text content of the entry.
    pub text: String,
    /// The vector embedding for this entry's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata (workspace id, source document, ...).
    pub metadata: HashMap<String, String>,
}

/// A retrieved [`IndexEntry`] paired with a similarity score.
///
/// Backends score by cosine similarity: higher is more relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The retrieved entry.
    pub entry: IndexEntry,
    /// The cosine similarity score (higher is more relevant).
    pub score: f32,
}

/// A search result as returned by [`WorkspaceIndex::search`](crate::WorkspaceIndex::search).
///
/// Unlike [`SearchHit`], results carry a *distance* (`1 - similarity`):
/// lower is more relevant, and results are ordered ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEntry {
    /// The text content of the matched entry.
    pub text: String,
    /// The metadata stored with the matched entry.
    pub metadata: HashMap<String, String>,
    /// Cosine distance to the query (lower is closer).
    pub distance: f32,
}
