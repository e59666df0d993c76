//! Vector store trait and stored entry types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A chunk of text stored alongside its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub embedding: Vec<f32>,
}

impl IndexedChunk {
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            source: None,
            embedding,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A stored chunk ranked against a query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub id: String,
    pub content: String,
    pub source: Option<String>,
    /// Cosine similarity to the query, higher is closer
    pub score: f32,
}

/// Collection of embedded chunks searchable by similarity
#[async_trait]
pub trait VectorStore: Send + Sync + std::fmt::Debug {
    fn collection_name(&self) -> &str;

    async fn add(&self, chunks: Vec<IndexedChunk>) -> Result<usize, DomainError>;

    /// Top `k` chunks by similarity to `query`; equal scores keep insertion order
    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;

    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }

    async fn clear(&self) -> Result<(), DomainError>;
}
