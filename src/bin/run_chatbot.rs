use std::process::ExitCode;

use clap::Parser;
use support_chatbot::cli::remote::{self, RemoteArgs};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    remote::run(RemoteArgs::parse()).await
}
