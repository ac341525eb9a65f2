//! File-backed persistent vector store.
//!
//! [`FsVectorStore`] keeps one JSON file per collection under a root
//! directory, with a write-through in-memory cache. Files are written to a
//! temporary path and renamed into place, so a crash mid-write never
//! leaves a half-written collection visible.
//!
//! A collection file that fails structural decoding, or whose schema
//! version differs from the one this build writes, triggers the one-shot
//! recovery path: the entire root directory is dropped and recreated, the
//! operation is retried once, and a second failure surfaces as
//! [`RagError::StorageCorrupt`]. The reset is destructive across *all*
//! collections in the store instance: last-resort recovery, not routine
//! behavior.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::document::{IndexEntry, SearchHit};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, cosine_similarity};

/// Version stamp written into every collection file.
const SCHEMA_VERSION: u32 = 1;

/// On-disk representation of one collection.
#[derive(Serialize, Deserialize)]
struct CollectionFile {
    schema_version: u32,
    entries: Vec<IndexEntry>,
}

/// A persistent [`VectorStore`] keeping one JSON file per collection.
///
/// Collections are created lazily: operating on a collection that was
/// never created behaves as operating on an empty one. Collection names
/// must be filesystem-safe (ASCII alphanumerics, `_`, `-`); the
/// [`WorkspaceIndex`](crate::WorkspaceIndex) naming scheme guarantees
/// this.
///
/// # Example
///
/// ```rust,ignore
/// use flowstack_rag::FsVectorStore;
///
/// let store = FsVectorStore::open("./vector_db")?;
/// store.upsert("workspace_abc", &entries).await?;
/// ```
#[derive(Debug)]
pub struct FsVectorStore {
    root: PathBuf,
    collections: RwLock<HashMap<String, HashMap<String, IndexEntry>>>,
}

impl FsVectorStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StorageUnavailable`] if the directory cannot
    /// be created or opened.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RagError::StorageUnavailable {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { root, collections: RwLock::new(HashMap::new()) })
    }

    /// Return the root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_name(name: &str) -> Result<()> {
        let safe = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if safe {
            Ok(())
        } else {
            Err(RagError::Backend {
                backend: "Fs".to_string(),
                message: format!("collection name '{name}' is not filesystem-safe"),
            })
        }
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Decode one collection file from disk.
    ///
    /// A missing file is an empty collection. An unreadable file is
    /// `StorageUnavailable`; a file that decodes to the wrong shape or
    /// schema version is `StorageCorrupt`.
    fn read_collection_file(&self, name: &str) -> Result<HashMap<String, IndexEntry>> {
        let path = self.collection_path(name);
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(&path).map_err(|e| RagError::StorageUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file: CollectionFile = serde_json::from_str(&raw).map_err(|e| {
            RagError::StorageCorrupt {
                message: format!("collection '{name}' failed to decode: {e}"),
            }
        })?;

        if file.schema_version != SCHEMA_VERSION {
            return Err(RagError::StorageCorrupt {
                message: format!(
                    "collection '{name}' has schema version {}, expected {SCHEMA_VERSION}",
                    file.schema_version
                ),
            });
        }

        Ok(file.entries.into_iter().map(|e| (e.id.clone(), e)).collect())
    }

    /// Write a collection to disk atomically (temp file, then rename).
    fn persist(&self, name: &str, entries: &HashMap<String, IndexEntry>) -> Result<()> {
        let file = CollectionFile {
            schema_version: SCHEMA_VERSION,
            entries: entries.values().cloned().collect(),
        };
        let json = serde_json::to_string(&file).map_err(|e| RagError::Backend {
            backend: "Fs".to_string(),
            message: format!("failed to encode collection '{name}': {e}"),
        })?;

        let path = self.collection_path(name);
        let tmp = self.root.join(format!("{name}.json.tmp"));
        fs::write(&tmp, json).map_err(|e| RagError::Backend {
            backend: "Fs".to_string(),
            message: format!("failed to write '{}': {e}", tmp.display()),
        })?;
        fs::rename(&tmp, &path).map_err(|e| RagError::Backend {
            backend: "Fs".to_string(),
            message: format!("failed to commit '{}': {e}", path.display()),
        })?;
        Ok(())
    }

    /// Drop the entire store root and start over. Clears every cached
    /// collection across all workspaces.
    async fn reset(&self) -> Result<()> {
        let mut cache = self.collections.write().await;
        cache.clear();
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|e| RagError::StorageCorrupt {
                message: format!("reset failed to remove '{}': {e}", self.root.display()),
            })?;
        }
        fs::create_dir_all(&self.root).map_err(|e| RagError::StorageCorrupt {
            message: format!("reset failed to recreate '{}': {e}", self.root.display()),
        })?;
        Ok(())
    }

    /// Load a collection into the cache, performing at most one
    /// reset-and-retry if its file is corrupt.
    async fn ensure_loaded(&self, name: &str) -> Result<()> {
        Self::validate_name(name)?;

        {
            let cache = self.collections.read().await;
            if cache.contains_key(name) {
                return Ok(());
            }
        }

        let entries = match self.read_collection_file(name) {
            Ok(entries) => entries,
            Err(RagError::StorageCorrupt { message }) => {
                warn!(
                    collection = name,
                    %message,
                    "schema mismatch detected, resetting store (drops all workspaces)"
                );
                self.reset().await?;
                self.read_collection_file(name).map_err(|e| RagError::StorageCorrupt {
                    message: format!("retry after reset failed: {e}"),
                })?
            }
            Err(e) => return Err(e),
        };

        let mut cache = self.collections.write().await;
        cache.entry(name.to_string()).or_insert(entries);
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FsVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        self.ensure_loaded(name).await?;
        if !self.collection_path(name).exists() {
            let cache = self.collections.read().await;
            let entries = cache.get(name).cloned().unwrap_or_default();
            self.persist(name, &entries)?;
            debug!(collection = name, "created collection file");
        }
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        Self::validate_name(name)?;
        let mut cache = self.collections.write().await;
        cache.remove(name);
        let path = self.collection_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(collection = name, "deleted collection file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RagError::Backend {
                backend: "Fs".to_string(),
                message: format!("failed to delete '{}': {e}", path.display()),
            }),
        }
    }

    async fn clear_collection(&self, name: &str) -> Result<()> {
        self.ensure_loaded(name).await?;
        let mut cache = self.collections.write().await;
        let store = cache.entry(name.to_string()).or_default();
        let next = HashMap::new();
        self.persist(name, &next)?;
        *store = next;
        Ok(())
    }

    async fn upsert(&self, collection: &str, entries: &[IndexEntry]) -> Result<()> {
        self.ensure_loaded(collection).await?;
        let mut cache = self.collections.write().await;
        let store = cache.entry(collection.to_string()).or_default();

        // Persist first, then swap: a failed write leaves the previous
        // state visible to readers instead of a cache/disk split.
        let mut next = store.clone();
        for entry in entries {
            next.insert(entry.id.clone(), entry.clone());
        }
        self.persist(collection, &next)?;
        *store = next;
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        self.ensure_loaded(collection).await?;
        let cache = self.collections.read().await;
        let store = cache.get(collection).map(|m| m.values()).into_iter().flatten();

        let mut scored: Vec<SearchHit> = store
            .map(|entry| {
                let score = cosine_similarity(&entry.embedding, embedding);
                SearchHit { entry: entry.clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<IndexEntry>> {
        self.ensure_loaded(collection).await?;
        let cache = self.collections.read().await;
        Ok(cache.get(collection).map(|m| m.values().cloned().collect()).unwrap_or_default())
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        self.ensure_loaded(collection).await?;
        let cache = self.collections.read().await;
        Ok(cache.get(collection).map(HashMap::len).unwrap_or(0))
    }
}
