//! Fixed-window character splitter

use crate::domain::ingestion::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Splits text into windows of `chunk_size` chars advancing by
/// `chunk_size - chunk_overlap`, so neighbours share exactly
/// `chunk_overlap` chars. Offsets are counted in chars.
#[derive(Debug, Clone, Default)]
pub struct CharacterTextSplitter;

impl CharacterTextSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl ChunkingStrategy for CharacterTextSplitter {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        // byte offset of every char boundary, including the end
        let boundaries: Vec<usize> = content
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(content.len()))
            .collect();
        let total_chars = boundaries.len() - 1;

        if total_chars <= config.chunk_size {
            return Ok(vec![Chunk::new(
                content,
                ChunkMetadata::new(0, 1, 0, total_chars),
            )]);
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + config.chunk_size).min(total_chars);

            chunks.push(Chunk::new(
                &content[boundaries[start]..boundaries[end]],
                ChunkMetadata::new(chunks.len(), 0, start, end),
            ));

            if end == total_chars {
                break;
            }

            start += config.step();
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.metadata.total_chunks = total;
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "character"
    }
}
