//! `run_chatbot`: customer support chat over a LangFlow flow

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use super::chat::{
    run_interactive, run_scripted, FlowChatBackend, DEFAULT_SESSION, REMOTE_TITLE, TEST_QUESTIONS,
};
use super::input::StdinLines;
use crate::config::{AppConfig, MISSING_OPENAI_KEY};
use crate::domain::flow::{openai_tweaks, FlowId, SessionId};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::langflow::LangflowClient;

/// Chat with the customer support flow running in LangFlow
#[derive(Debug, Parser)]
#[command(name = "run_chatbot", version)]
pub struct RemoteArgs {
    /// Flow to run (see `langflow_client list` or the LangFlow UI)
    pub flow_id: Option<String>,

    /// Ask the fixed test questions instead of chatting
    #[arg(long)]
    pub test: bool,

    /// Session token for conversation continuity in interactive mode
    #[arg(long)]
    pub session: Option<String>,
}

fn print_usage() {
    println!("Usage:");
    println!("  Interactive mode: run_chatbot <flow_id>");
    println!("  Test mode: run_chatbot <flow_id> --test");
    println!();
    println!("To get flow_id, upload the flow using langflow_client or check LangFlow UI");
}

pub async fn run(args: RemoteArgs) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap()?;
    execute(args, &config).await
}

async fn execute(args: RemoteArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let Ok(api_key) = config.openai.require_api_key() else {
        println!("Error: {MISSING_OPENAI_KEY}");
        println!("Please create a .env file with your OpenAI API key");
        return Ok(ExitCode::FAILURE);
    };

    let Some(flow_id) = args.flow_id else {
        print_usage();
        return Ok(ExitCode::FAILURE);
    };

    let flow_id = match FlowId::new(flow_id) {
        Ok(id) => id,
        Err(e) => {
            println!("Error: {e}");
            print_usage();
            return Ok(ExitCode::FAILURE);
        }
    };

    let http = HttpClient::from_timeout_secs(config.http.timeout_secs)?;
    let client = LangflowClient::from_config(http, &config.langflow);
    let tweaks = openai_tweaks(&api_key, &config.rag.chat_model, config.rag.temperature);

    info!(flow_id = %flow_id, base_url = client.base_url(), "Starting remote chatbot");

    let backend = FlowChatBackend::new(client, flow_id, tweaks);
    let mut stdout = io::stdout();

    if args.test {
        let summary = run_scripted(&backend, &TEST_QUESTIONS, &mut stdout).await?;
        if summary.failed > 0 {
            error!(failed = summary.failed, total = summary.total(), "Some test questions failed");
        }
    } else {
        let session = args.session.unwrap_or_else(|| DEFAULT_SESSION.to_string());
        let backend = backend.with_session(SessionId::non_blank(session));
        let stdin = StdinLines::spawn();

        run_interactive(&backend, stdin, &mut stdout, super::interrupted(), REMOTE_TITLE).await?;
    }

    Ok(ExitCode::SUCCESS)
}
