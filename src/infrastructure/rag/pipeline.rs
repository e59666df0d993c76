use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::chain::{
    QaResult, RetrievalQaChain, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TOP_K, PROMPT_TEMPLATE,
};
use crate::config::RagConfig;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, DocumentLoader, SourceDocument};
use crate::domain::llm::LlmProvider;
use crate::domain::prompt::PromptTemplate;
use crate::domain::vector_store::{IndexedChunk, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::{CharacterTextSplitter, TextLoader};
use crate::infrastructure::vector_store::PersistentVectorStore;

/// Everything needed to build a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RagSettings {
    pub knowledge_base_path: PathBuf,
    pub persist_directory: PathBuf,
    pub collection_name: String,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            knowledge_base_path: PathBuf::from("data/knowledge_base.txt"),
            persist_directory: PathBuf::from("./chroma_db"),
            collection_name: "customer_support".to_string(),
            chunking: ChunkingConfig::default(),
            top_k: DEFAULT_TOP_K,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl From<&RagConfig> for RagSettings {
    fn from(config: &RagConfig) -> Self {
        Self {
            knowledge_base_path: PathBuf::from(&config.knowledge_base_path),
            persist_directory: PathBuf::from(&config.persist_directory),
            collection_name: config.collection_name.clone(),
            chunking: ChunkingConfig::new(config.chunk_size, config.chunk_overlap),
            top_k: config.top_k,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
        }
    }
}

/// Identifies the content an index was built from
pub fn index_fingerprint(
    documents: &[SourceDocument],
    chunking: &ChunkingConfig,
    embedding_model: &str,
) -> String {
    let mut hasher = Sha256::new();

    for document in documents {
        hasher.update(document.content.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(chunking.chunk_size.to_le_bytes());
    hasher.update(chunking.chunk_overlap.to_le_bytes());
    hasher.update(embedding_model.as_bytes());

    hex::encode(hasher.finalize())
}

/// A ready-to-query pipeline over one knowledge base
#[derive(Debug)]
pub struct RagPipeline {
    chain: RetrievalQaChain,
    chunk_count: usize,
}

impl RagPipeline {
    /// Load, split, index and compose. Any failure is an `Initialization` error.
    pub async fn build(
        settings: RagSettings,
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        Self::assemble(settings, llm, embedder)
            .await
            .map_err(|e| match e {
                DomainError::Initialization { .. } => e,
                other => DomainError::initialization(other.to_string()),
            })
    }

    async fn assemble(
        settings: RagSettings,
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let documents = TextLoader::new().load(&settings.knowledge_base_path).await?;

        let splitter = CharacterTextSplitter::new();
        let chunks = splitter.split_documents(&documents, &settings.chunking)?;

        if chunks.is_empty() {
            return Err(DomainError::initialization(format!(
                "Knowledge base at {} contains no text",
                settings.knowledge_base_path.display()
            )));
        }

        info!(
            path = %settings.knowledge_base_path.display(),
            chunks = chunks.len(),
            splitter = splitter.name(),
            "Split knowledge base"
        );

        let fingerprint = index_fingerprint(&documents, &settings.chunking, &settings.embedding_model);
        let store =
            PersistentVectorStore::open(&settings.persist_directory, &settings.collection_name)
                .await?;

        let stored = store.len().await?;
        if store.fingerprint().await.as_deref() == Some(fingerprint.as_str()) && stored == chunks.len() {
            info!(collection = %settings.collection_name, entries = stored, "Reusing persisted index");
        } else {
            if stored > 0 {
                warn!(collection = %settings.collection_name, "Knowledge base changed, rebuilding index");
            }

            let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
            let vectors = embedder
                .embed_documents(&settings.embedding_model, texts)
                .await?;

            let entries: Vec<IndexedChunk> = chunks
                .into_iter()
                .zip(vectors)
                .map(|(chunk, vector)| {
                    let entry = IndexedChunk::new(chunk.content, vector);
                    match chunk.metadata.source {
                        Some(source) => entry.with_source(source),
                        None => entry,
                    }
                })
                .collect();

            let indexed = store.replace(fingerprint, entries).await?;
            info!(collection = %settings.collection_name, entries = indexed, "Built index");
        }

        let chunk_count = store.len().await?;

        let prompt = PromptTemplate::new(PROMPT_TEMPLATE, &["context", "question"])
            .map_err(|e| DomainError::initialization(e.to_string()))?;

        let chain = RetrievalQaChain::new(llm, embedder, Arc::new(store), prompt)
            .with_chat_model(settings.chat_model)
            .with_embedding_model(settings.embedding_model)
            .with_temperature(settings.temperature)
            .with_top_k(settings.top_k);

        Ok(Self { chain, chunk_count })
    }

    /// Answer text for `question`
    pub async fn ask(&self, question: &str) -> Result<String, DomainError> {
        Ok(self.chain.invoke(question).await?.answer)
    }

    pub async fn invoke(&self, question: &str) -> Result<QaResult, DomainError> {
        self.chain.invoke(question).await
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }
}
