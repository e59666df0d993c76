//! Loaded source documents

use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Text loaded from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub content: String,
    pub source: String,
}

impl SourceDocument {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// Reads a path into one or more documents
#[async_trait]
pub trait DocumentLoader: Send + Sync + std::fmt::Debug {
    async fn load(&self, path: &Path) -> Result<Vec<SourceDocument>, DomainError>;
}
