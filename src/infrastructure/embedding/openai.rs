//! Embeddings over an OpenAI-compatible `/v1/embeddings` endpoint

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;
use crate::infrastructure::llm::DEFAULT_OPENAI_BASE_URL;

const PROVIDER: &str = "openai";

#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    endpoint: String,
    authorization: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();

        Self {
            client,
            endpoint: format!("{}/v1/embeddings", base_url.trim_end_matches('/')),
            authorization: format!("Bearer {}", api_key.into()),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        // EmbeddingRequest already serializes as `{"model", "input"}`
        let body = serde_json::to_value(&request).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to encode request: {}", e))
        })?;

        let headers = vec![
            ("Authorization", self.authorization.as_str()),
            ("Content-Type", "application/json"),
        ];
        let json = self.client.post_json(&self.endpoint, headers, &body).await?;

        let batch: EmbeddingBatch = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse embedding response: {}", e))
        })?;
        let total_tokens = batch.usage.map_or(0, |usage| usage.total_tokens);

        Ok(EmbeddingResponse::new(batch.model, batch.data, total_tokens))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn default_model(&self) -> &'static str {
        "text-embedding-3-small"
    }
}

#[derive(Deserialize)]
struct EmbeddingBatch {
    model: String,
    data: Vec<Embedding>,
    usage: Option<BatchUsage>,
}

#[derive(Deserialize)]
struct BatchUsage {
    total_tokens: u32,
}
