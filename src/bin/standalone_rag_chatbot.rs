use std::process::ExitCode;

use clap::Parser;
use support_chatbot::cli::standalone::{self, StandaloneArgs};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    standalone::run(StandaloneArgs::parse()).await
}
