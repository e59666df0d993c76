//! `langflow_client`: list, inspect, run, upload and delete flows

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::domain::flow::{FlowClient, SessionId, Tweaks};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::langflow::LangflowClient;

/// Manage flows on a LangFlow server
#[derive(Debug, Parser)]
#[command(name = "langflow_client", version)]
pub struct FlowsCli {
    #[command(subcommand)]
    pub command: Option<FlowCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FlowCommand {
    /// List all flows (default)
    List,

    /// Show one flow
    Get { flow_id: String },

    /// Run a flow with a single input message
    Run {
        flow_id: String,
        message: String,

        /// Session token for conversation continuity
        #[arg(long)]
        session: Option<String>,

        /// Per-node overrides as a JSON object
        #[arg(long, value_parser = parse_tweaks)]
        tweaks: Option<Tweaks>,
    },

    /// Upload a flow definition from a JSON file
    Upload { path: PathBuf },

    /// Delete a flow
    Delete { flow_id: String },
}

impl FlowCommand {
    fn operation(&self) -> &'static str {
        match self {
            Self::List => "list flows",
            Self::Get { .. } => "get flow",
            Self::Run { .. } => "run flow",
            Self::Upload { .. } => "upload flow",
            Self::Delete { .. } => "delete flow",
        }
    }
}

fn parse_tweaks(raw: &str) -> Result<Tweaks, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(tweaks)) => Ok(tweaks),
        Ok(_) => Err("tweaks must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}

/// Perform `command` against `client`, returning the server's JSON
pub async fn execute<F>(client: &F, command: FlowCommand) -> Result<Value, DomainError>
where
    F: FlowClient + ?Sized,
{
    match command {
        FlowCommand::List => client.list_flows().await,
        FlowCommand::Get { flow_id } => client.get_flow(&flow_id).await,
        FlowCommand::Run {
            flow_id,
            message,
            session,
            tweaks,
        } => {
            client
                .run_flow(&flow_id, &message, tweaks, session.and_then(SessionId::non_blank))
                .await
        }
        FlowCommand::Upload { path } => client.upload_flow(&path).await,
        FlowCommand::Delete { flow_id } => client.delete_flow(&flow_id).await,
    }
}

pub async fn run(cli: FlowsCli) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap()?;

    let http = HttpClient::from_timeout_secs(config.http.timeout_secs)?;
    let client = LangflowClient::from_config(http, &config.langflow);

    let command = cli.command.unwrap_or(FlowCommand::List);
    let operation = command.operation();

    if matches!(command, FlowCommand::List) {
        println!("Listing all flows...");
    }

    match execute(&client, command).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("Could not {operation}: {e}");
            println!("Make sure LangFlow is running on {}", client.base_url());
            Ok(ExitCode::FAILURE)
        }
    }
}
