//! Narrow interface to the relational metadata store.
//!
//! The core does not own document metadata; an external collaborator
//! records which filenames belong to which workspace. The execution
//! engine only needs one lookup from it, so the seam is a single method.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

/// Lookup of document filenames belonging to a workspace.
#[async_trait]
pub trait DocumentRegistry: Send + Sync {
    /// List the filenames of documents uploaded to a workspace.
    async fn list_document_names(&self, workspace_id: &str) -> Result<Vec<String>>;
}

/// An in-process [`DocumentRegistry`] for tests and single-process
/// deployments without a relational store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRegistry {
    names: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryDocumentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document filename for a workspace.
    pub async fn record(&self, workspace_id: &str, filename: &str) {
        let mut names = self.names.write().await;
        let list = names.entry(workspace_id.to_string()).or_default();
        if !list.iter().any(|n| n == filename) {
            list.push(filename.to_string());
        }
    }
}

#[async_trait]
impl DocumentRegistry for InMemoryDocumentRegistry {
    async fn list_document_names(&self, workspace_id: &str) -> Result<Vec<String>> {
        let names = self.names.read().await;
        Ok(names.get(workspace_id).cloned().unwrap_or_default())
    }
}
