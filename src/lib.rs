//! ACME Corp customer support chatbots
//!
//! Two ways to answer customer questions:
//! - through a flow hosted by a LangFlow server (`LangflowClient`)
//! - through a local retrieval pipeline over a knowledge-base file
//!   (`RagPipeline`), backed by OpenAI chat and embedding models

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
