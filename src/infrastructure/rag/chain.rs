use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::prompt::PromptTemplate;
use crate::domain::vector_store::{ScoredChunk, VectorStore};
use crate::domain::DomainError;

/// Prompt used to answer customer questions from retrieved context
pub const PROMPT_TEMPLATE: &str = "You are a helpful customer support assistant for ACME Corp.
Use the following context from our knowledge base to answer the customer's question.
If you don't know the answer based on the context, politely say so and suggest contacting support.

Context:
{context}

Customer Question: {question}

Helpful Answer:";

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_K: usize = 3;

/// Answer plus the chunks it was grounded on
#[derive(Debug, Clone)]
pub struct QaResult {
    pub answer: String,
    pub source_documents: Vec<ScoredChunk>,
}

/// Retrieve-then-answer chain using the "stuff" strategy
#[derive(Debug)]
pub struct RetrievalQaChain {
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    prompt: PromptTemplate,
    chat_model: String,
    embedding_model: String,
    temperature: f64,
    top_k: usize,
}

impl RetrievalQaChain {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            llm,
            embedder,
            store,
            prompt,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Chunks most similar to `question`, best first
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>, DomainError> {
        let query = self
            .embedder
            .embed_query(&self.embedding_model, question)
            .await?;

        self.store.similarity_search(&query, self.top_k).await
    }

    pub async fn invoke(&self, question: &str) -> Result<QaResult, DomainError> {
        let source_documents = self.retrieve(question).await?;

        let context = source_documents
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let values = HashMap::from([("context", context.as_str()), ("question", question)]);
        let prompt = self
            .prompt
            .render(&values)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        debug!(
            retrieved = source_documents.len(),
            model = %self.chat_model,
            "Asking chat model"
        );

        let request = LlmRequest::single_turn(prompt).with_temperature(self.temperature);
        let response = self.llm.chat(&self.chat_model, request).await?;

        if let Some(usage) = response.usage {
            debug!(tokens = usage.total(), "Chat model usage");
        }
        if response.is_truncated() {
            warn!(model = %response.model, "Answer was cut off by the token limit");
        }

        Ok(QaResult {
            answer: response.content().to_string(),
            source_documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::vector_store::IndexedChunk;
    use crate::infrastructure::vector_store::PersistentVectorStore;
    use tempfile::TempDir;

    async fn seeded_store(dir: &TempDir, embedder: &MockEmbeddingProvider) -> Arc<PersistentVectorStore> {
        let texts = vec![
            "Return policy: items can be returned within 30 days.".to_string(),
            "Shipping takes 5 business days.".to_string(),
            "Support hours are 9am to 5pm.".to_string(),
            "Warranty covers one year of use.".to_string(),
        ];
        let vectors = embedder
            .embed_documents("mock-embedding", texts.clone())
            .await
            .unwrap();

        let store = PersistentVectorStore::open(dir.path(), "kb").await.unwrap();
        store
            .add(
                texts
                    .into_iter()
                    .zip(vectors)
                    .map(|(text, vector)| IndexedChunk::new(text, vector))
                    .collect(),
            )
            .await
            .unwrap();

        Arc::new(store)
    }

    fn prompt() -> PromptTemplate {
        PromptTemplate::new(PROMPT_TEMPLATE, &["context", "question"]).unwrap()
    }

    #[test]
    fn test_prompt_template_slots() {
        let template = prompt();
        assert_eq!(template.input_variables(), &["context", "question"]);
        assert!(template.template().ends_with("Helpful Answer:"));
    }

    #[tokio::test]
    async fn test_invoke_stuffs_top_k_chunks_into_prompt() {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(MockEmbeddingProvider::new(64));
        let store = seeded_store(&dir, &embedder).await;
        let llm = Arc::new(MockLlmProvider::new("mock").with_answer("30 days."));

        let chain = RetrievalQaChain::new(llm.clone(), embedder.clone(), store, prompt())
            .with_embedding_model("mock-embedding");

        let result = chain.invoke("What is your return policy?").await.unwrap();

        assert_eq!(result.answer, "30 days.");
        assert_eq!(result.source_documents.len(), 3);
        assert!(result.source_documents[0].content.starts_with("Return policy"));

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        let (model, request) = &requests[0];
        assert_eq!(model, "gpt-3.5-turbo");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.temperature, Some(0.7));

        let sent = request.messages[0].content_text();
        assert!(sent.contains("Customer Question: What is your return policy?"));
        let expected_context = result
            .source_documents
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        assert!(sent.contains(&format!("Context:\n{}\n", expected_context)));
    }

    #[tokio::test]
    async fn test_retrieval_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(MockEmbeddingProvider::new(64));
        let store = seeded_store(&dir, &embedder).await;
        let llm = Arc::new(MockLlmProvider::new("mock"));

        let chain = RetrievalQaChain::new(llm, embedder, store, prompt()).with_top_k(2);

        let first: Vec<String> = chain.retrieve("shipping days").await.unwrap().into_iter().map(|c| c.id).collect();
        let second: Vec<String> = chain.retrieve("shipping days").await.unwrap().into_iter().map(|c| c.id).collect();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(MockEmbeddingProvider::new(64));
        let store = seeded_store(&dir, &embedder).await;
        let llm = Arc::new(MockLlmProvider::new("mock").with_error("rate limited"));

        let chain = RetrievalQaChain::new(llm, embedder, store, prompt());
        let error = chain.invoke("Hello?").await.unwrap_err();

        assert!(matches!(error, DomainError::Provider { .. }));
    }
}
