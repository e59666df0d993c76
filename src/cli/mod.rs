//! Command-line entry points
//!
//! - `remote`: chat with a flow hosted by LangFlow (`run_chatbot`)
//! - `standalone`: chat with the local retrieval pipeline (`standalone_rag_chatbot`)
//! - `flows`: manage flows on the LangFlow server (`langflow_client`)

pub mod chat;
pub mod flows;
pub mod input;
pub mod remote;
pub mod standalone;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Load `.env`, the layered configuration and install logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    Ok(config)
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
