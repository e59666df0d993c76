//! Domain layer - Core types and the traits external services plug into

pub mod embedding;
pub mod error;
pub mod flow;
pub mod ingestion;
pub mod llm;
pub mod prompt;
pub mod vector_store;

pub use embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use flow::{FlowClient, FlowId, FlowReply, RunFlowRequest, SessionId, Tweaks};
pub use ingestion::{
    Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, DocumentLoader, SourceDocument,
};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use prompt::{PromptTemplate, TemplateError};
pub use vector_store::{IndexedChunk, ScoredChunk, VectorStore};
