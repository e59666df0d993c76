//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, HttpConfig, LangflowConfig, LogFormat, LoggingConfig, OpenAiConfig, RagConfig,
    MISSING_OPENAI_KEY,
};
