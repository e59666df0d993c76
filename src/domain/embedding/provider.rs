//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    fn default_model(&self) -> &'static str;

    /// Embed a batch of texts, returning one vector per text in order
    async fn embed_documents(
        &self,
        model: &str,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected = texts.len();
        let response = self.embed(EmbeddingRequest::new(model, texts)).await?;

        debug!(
            provider = self.provider_name(),
            model = response.model(),
            inputs = expected,
            tokens = response.total_tokens(),
            "Embedded batch"
        );

        response.into_vectors(expected)
    }

    /// Embed a single query text
    async fn embed_query(&self, model: &str, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self
            .embed_documents(model, vec![text.to_string()])
            .await?;

        vectors
            .pop()
            .ok_or_else(|| DomainError::provider(self.provider_name(), "empty embedding response"))
    }
}
