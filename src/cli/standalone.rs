//! `standalone_rag_chatbot`: customer support chat over a local knowledge base

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use super::chat::{run_interactive, run_scripted, RagChatBackend, STANDALONE_TITLE, TEST_QUESTIONS};
use super::input::StdinLines;
use crate::config::{AppConfig, MISSING_OPENAI_KEY};
use crate::infrastructure::embedding::OpenAiEmbeddingProvider;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::llm::{OpenAiProvider, DEFAULT_OPENAI_BASE_URL};
use crate::infrastructure::rag::{RagPipeline, RagSettings};

/// Answer customer questions from a local knowledge base, without LangFlow
#[derive(Debug, Parser)]
#[command(name = "standalone_rag_chatbot", version)]
pub struct StandaloneArgs {
    /// Ask the fixed test questions instead of chatting
    #[arg(long)]
    pub test: bool,

    /// Knowledge base text file (overrides `rag.knowledge_base_path`)
    #[arg(long = "knowledge-base", value_name = "PATH")]
    pub knowledge_base: Option<PathBuf>,
}

pub async fn run(args: StandaloneArgs) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap()?;

    let Some(pipeline) = prepare(&args, &config).await? else {
        return Ok(ExitCode::FAILURE);
    };

    let backend = RagChatBackend::new(pipeline);
    let mut stdout = io::stdout();

    if args.test {
        run_scripted(&backend, &TEST_QUESTIONS, &mut stdout).await?;
    } else {
        let stdin = StdinLines::spawn();
        run_interactive(&backend, stdin, &mut stdout, super::interrupted(), STANDALONE_TITLE)
            .await?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Validate prerequisites and build the pipeline; `None` after reporting a fatal problem
async fn prepare(args: &StandaloneArgs, config: &AppConfig) -> anyhow::Result<Option<RagPipeline>> {
    let Ok(api_key) = config.openai.require_api_key() else {
        println!("Error: {MISSING_OPENAI_KEY}");
        return Ok(None);
    };

    let mut settings = RagSettings::from(&config.rag);
    if let Some(path) = &args.knowledge_base {
        settings.knowledge_base_path = path.clone();
    }

    if !settings.knowledge_base_path.is_file() {
        println!(
            "Error: Knowledge base not found at {}",
            settings.knowledge_base_path.display()
        );
        return Ok(None);
    }

    let http = HttpClient::from_timeout_secs(config.http.timeout_secs)?;
    let base_url = config
        .openai
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

    let llm = Arc::new(OpenAiProvider::with_base_url(http.clone(), &api_key, &base_url));
    let embedder = Arc::new(OpenAiEmbeddingProvider::with_base_url(http, &api_key, &base_url));

    println!("Setting up RAG pipeline...");

    match RagPipeline::build(settings, llm, embedder).await {
        Ok(pipeline) => {
            println!("Created {} text chunks", pipeline.chunk_count());
            println!("RAG pipeline ready!");
            println!();
            Ok(Some(pipeline))
        }
        Err(e) => {
            tracing::error!(error = %e, "Pipeline initialization failed");
            println!("Error initializing chatbot: {e}");
            Ok(None)
        }
    }
}
