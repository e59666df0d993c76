//! Document ingestion domain types and traits
//!
//! - `DocumentLoader` reads a knowledge-base file into documents
//! - `ChunkingStrategy` splits documents into overlapping chunks

pub mod chunker;
pub mod document;

pub use chunker::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
pub use document::{DocumentLoader, SourceDocument};
