//! JSON-file backed vector store
//!
//! A collection lives in memory and is written to `<dir>/<collection>.json`
//! after every change. Writes go to a sibling temp file that is then renamed
//! over the target, so a crash never leaves a half-written collection.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::embedding::cosine_similarity;
use crate::domain::vector_store::{IndexedChunk, ScoredChunk, VectorStore};
use crate::domain::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Collection {
    name: String,
    #[serde(default)]
    fingerprint: Option<String>,
    #[serde(default)]
    dimensions: Option<usize>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    entries: Vec<IndexedChunk>,
}

impl Collection {
    fn empty(name: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            fingerprint: None,
            dimensions: None,
            created_at: now,
            updated_at: now,
            entries: Vec::new(),
        }
    }

    fn push_all(&mut self, chunks: Vec<IndexedChunk>) -> Result<usize, DomainError> {
        let mut dimensions = self.dimensions;

        for chunk in &chunks {
            let len = chunk.embedding.len();
            match dimensions {
                None if len > 0 => dimensions = Some(len),
                Some(expected) if expected != len => {
                    return Err(DomainError::validation(format!(
                        "Embedding dimension mismatch in collection '{}': expected {}, got {}",
                        self.name, expected, len
                    )));
                }
                None => {
                    return Err(DomainError::validation("Cannot index an empty embedding"));
                }
                _ => {}
            }
        }

        let count = chunks.len();
        self.dimensions = dimensions;
        self.entries.extend(chunks);
        self.updated_at = Utc::now();

        Ok(count)
    }
}

/// Vector store persisted as one JSON document per collection
#[derive(Debug, Clone)]
pub struct PersistentVectorStore {
    name: String,
    path: PathBuf,
    collection: Arc<RwLock<Collection>>,
}

impl PersistentVectorStore {
    /// Open a collection under `directory`, loading it if it was persisted before
    pub async fn open(
        directory: impl AsRef<Path>,
        collection: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = collection.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Collection name cannot be empty"));
        }

        let path = directory.as_ref().join(format!("{}.json", name));

        let collection = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let stored: Collection = serde_json::from_slice(&bytes).map_err(|e| {
                    DomainError::storage(format!(
                        "Corrupt collection file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                info!(
                    collection = %name,
                    entries = stored.entries.len(),
                    "Loaded persisted collection"
                );
                stored
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collection::empty(&name),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(Self {
            name,
            path,
            collection: Arc::new(RwLock::new(collection)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fingerprint of the content the collection was built from
    pub async fn fingerprint(&self) -> Option<String> {
        self.collection.read().await.fingerprint.clone()
    }

    /// Swap the whole collection for `chunks` built from `fingerprint`
    pub async fn replace(
        &self,
        fingerprint: impl Into<String>,
        chunks: Vec<IndexedChunk>,
    ) -> Result<usize, DomainError> {
        let mut rebuilt = Collection::empty(&self.name);
        let count = rebuilt.push_all(chunks)?;
        rebuilt.fingerprint = Some(fingerprint.into());

        let mut collection = self.collection.write().await;
        self.persist(&rebuilt).await?;
        *collection = rebuilt;

        Ok(count)
    }

    async fn persist(&self, collection: &Collection) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let bytes = serde_json::to_vec(collection)
            .map_err(|e| DomainError::storage(format!("Failed to encode collection: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(DomainError::storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!(path = %self.path.display(), entries = collection.entries.len(), "Persisted collection");

        Ok(())
    }
}

#[async_trait]
impl VectorStore for PersistentVectorStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn add(&self, chunks: Vec<IndexedChunk>) -> Result<usize, DomainError> {
        let mut collection = self.collection.write().await;
        let mut updated = collection.clone();
        let count = updated.push_all(chunks)?;

        self.persist(&updated).await?;
        *collection = updated;

        Ok(count)
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        let collection = self.collection.read().await;

        if k == 0 || collection.entries.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(expected) = collection.dimensions {
            if expected != query.len() {
                return Err(DomainError::validation(format!(
                    "Query dimension mismatch: expected {}, got {}",
                    expected,
                    query.len()
                )));
            }
        }

        let mut scored: Vec<ScoredChunk> = collection
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                id: entry.id.clone(),
                content: entry.content.clone(),
                source: entry.source.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        // stable sort: equal scores stay in insertion order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.collection.read().await.entries.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut collection = self.collection.write().await;
        let cleared = Collection::empty(&self.name);

        self.persist(&cleared).await?;
        *collection = cleared;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn chunk(content: &str, embedding: Vec<f32>) -> IndexedChunk {
        IndexedChunk::new(content, embedding).with_source("kb.txt")
    }

    #[tokio::test]
    async fn test_open_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "customer_support")
            .await
            .unwrap();

        assert_eq!(store.collection_name(), "customer_support");
        assert!(store.is_empty().await.unwrap());
        assert!(store.fingerprint().await.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_empty_collection_name_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(PersistentVectorStore::open(dir.path(), " ").await.is_err());
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();

        store
            .add(vec![
                chunk("shipping", vec![0.0, 1.0, 0.0]),
                chunk("returns", vec![1.0, 0.0, 0.0]),
                chunk("mixed", vec![0.7, 0.7, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.1, 0.0], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "returns");
        assert_eq!(results[1].content, "mixed");
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].source.as_deref(), Some("kb.txt"));
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();

        store
            .add(vec![
                chunk("first", vec![1.0, 0.0]),
                chunk("second", vec![1.0, 0.0]),
                chunk("third", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        for _ in 0..3 {
            let results = store.similarity_search(&[1.0, 0.0], 2).await.unwrap();
            let contents: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
            assert_eq!(contents, vec!["first", "second"]);
        }
    }

    #[tokio::test]
    async fn test_k_larger_than_collection() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();
        store.add(vec![chunk("only", vec![1.0])]).await.unwrap();

        assert_eq!(store.similarity_search(&[1.0], 3).await.unwrap().len(), 1);
        assert!(store.similarity_search(&[1.0], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();
        store.add(vec![chunk("a", vec![1.0, 0.0])]).await.unwrap();

        let add_error = store.add(vec![chunk("b", vec![1.0, 0.0, 0.0])]).await.unwrap_err();
        assert!(matches!(add_error, DomainError::Validation { .. }));
        assert_eq!(store.len().await.unwrap(), 1);

        let search_error = store.similarity_search(&[1.0], 1).await.unwrap_err();
        assert!(matches!(search_error, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_persisted_collection_reopens() {
        let dir = TempDir::new().unwrap();

        {
            let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();
            store
                .replace("abc123", vec![chunk("returns", vec![1.0, 0.0])])
                .await
                .unwrap();
            assert!(store.path().exists());
        }

        let reopened = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();

        assert_eq!(reopened.len().await.unwrap(), 1);
        assert_eq!(reopened.fingerprint().await.as_deref(), Some("abc123"));
        let results = reopened.similarity_search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results[0].content, "returns");
        assert!(!dir.path().join("kb.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_replace_drops_previous_entries() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();

        store.replace("v1", vec![chunk("old", vec![1.0])]).await.unwrap();
        store
            .replace("v2", vec![chunk("new", vec![0.0, 1.0]), chunk("newer", vec![1.0, 0.0])])
            .await
            .unwrap();

        assert_eq!(store.len().await.unwrap(), 2);
        assert_eq!(store.fingerprint().await.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = TempDir::new().unwrap();
        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();
        store.replace("v1", vec![chunk("a", vec![1.0])]).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.is_empty().await.unwrap());
        assert!(store.fingerprint().await.is_none());

        let reopened = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();
        assert!(reopened.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("kb.json"), "{not json").unwrap();

        let error = PersistentVectorStore::open(dir.path(), "kb").await.unwrap_err();
        assert!(matches!(error, DomainError::Storage { .. }));
    }
}
