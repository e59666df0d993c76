use std::process::ExitCode;

use clap::Parser;
use support_chatbot::cli::flows::{self, FlowsCli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    flows::run(FlowsCli::parse()).await
}
