//! Infrastructure layer - External service implementations

pub mod embedding;
pub mod http_client;
pub mod ingestion;
pub mod langflow;
pub mod llm;
pub mod logging;
pub mod rag;
pub mod vector_store;
