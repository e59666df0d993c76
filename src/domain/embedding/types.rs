//! Embedding request and response types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Request to embed a batch of texts with one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, input: Vec<String>) -> Self {
        Self {
            model: model.into(),
            input,
        }
    }

    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(model, vec![text.into()])
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inputs(&self) -> &[String] {
        &self.input
    }
}

/// A single embedding vector and its position in the request batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    index: usize,
    embedding: Vec<f32>,
}

impl Embedding {
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }
}

/// Response from an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    model: String,
    data: Vec<Embedding>,
    total_tokens: u32,
}

impl EmbeddingResponse {
    pub fn new(model: String, data: Vec<Embedding>, total_tokens: u32) -> Self {
        Self {
            model,
            data,
            total_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn total_tokens(&self) -> u32 {
        self.total_tokens
    }

    /// Vectors in request order; fails unless exactly `expected` came back
    pub fn into_vectors(self, expected: usize) -> Result<Vec<Vec<f32>>, DomainError> {
        if self.data.len() != expected {
            return Err(DomainError::provider(
                "embedding",
                format!("expected {} embeddings, got {}", expected, self.data.len()),
            ));
        }

        let mut data = self.data;
        data.sort_by_key(|e| e.index);

        Ok(data.into_iter().map(|e| e.embedding).collect())
    }
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_single() {
        let request = EmbeddingRequest::single("text-embedding-3-small", "test");

        assert_eq!(request.model(), "text-embedding-3-small");
        assert_eq!(request.inputs(), ["test".to_string()]);
    }

    #[test]
    fn test_into_vectors_restores_request_order() {
        let response = EmbeddingResponse::new(
            "m".into(),
            vec![Embedding::new(1, vec![1.0]), Embedding::new(0, vec![0.0])],
            4,
        );

        let vectors = response.into_vectors(2).unwrap();
        assert_eq!(vectors, vec![vec![0.0], vec![1.0]]);
    }

    #[test]
    fn test_into_vectors_count_mismatch() {
        let response = EmbeddingResponse::new("m".into(), vec![Embedding::new(0, vec![0.0])], 1);
        assert!(response.into_vectors(3).is_err());
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
