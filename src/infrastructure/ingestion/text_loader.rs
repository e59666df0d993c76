//! Plain-text knowledge base loader

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ingestion::{DocumentLoader, SourceDocument};
use crate::domain::DomainError;

/// Loads a whole UTF-8 file as a single document
#[derive(Debug, Clone, Default)]
pub struct TextLoader;

impl TextLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self, path: &Path) -> Result<Vec<SourceDocument>, DomainError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                DomainError::not_found(format!("Knowledge base not found at {}", path.display()))
            }
            _ => DomainError::storage(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        let content = String::from_utf8(bytes).map_err(|e| {
            DomainError::parse(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), chars = content.chars().count(), "Loaded document");

        Ok(vec![SourceDocument::new(content, path.display().to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Return policy: 30 days.\nShipping: 5 days.").unwrap();

        let documents = TextLoader::new().load(file.path()).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert!(documents[0].content.starts_with("Return policy"));
        assert_eq!(documents[0].source, file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let error = TextLoader::new()
            .load(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let error = TextLoader::new().load(file.path()).await.unwrap_err();

        assert!(matches!(error, DomainError::Parse { .. }));
    }
}
