use serde::Deserialize;

use crate::domain::DomainError;

/// Application configuration
///
/// Sources, lowest precedence first: built-in defaults, `config/default`,
/// `config/local`, `APP__SECTION__KEY` variables, then the well-known
/// variables (`LANGFLOW_HOST`, `OPENAI_API_KEY`, ...).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub langflow: LangflowConfig,
    pub openai: OpenAiConfig,
    pub rag: RagConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LangflowConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub knowledge_base_path: String,
    pub persist_directory: String,
    pub collection_name: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout; the transport default applies when unset
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LangflowConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
            api_key: None,
        }
    }
}

impl LangflowConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Reported when no OpenAI key is configured
pub const MISSING_OPENAI_KEY: &str = "OPENAI_API_KEY not found in environment variables";

impl OpenAiConfig {
    /// The API key, or a configuration error naming the missing variable
    pub fn require_api_key(&self) -> Result<String, DomainError> {
        self.api_key
            .clone()
            .ok_or_else(|| DomainError::configuration(MISSING_OPENAI_KEY))
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            knowledge_base_path: "data/knowledge_base.txt".to_string(),
            persist_directory: "./chroma_db".to_string(),
            collection_name: "customer_support".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 3,
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: 0.7,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Well-known variables and the keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("LANGFLOW_HOST", "langflow.host"),
    ("LANGFLOW_PORT", "langflow.port"),
    ("LANGFLOW_API_KEY", "langflow.api_key"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("OPENAI_BASE_URL", "openai.base_url"),
];

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve the well-known variables
    pub fn load_with<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for &(variable, key) in ENV_OVERRIDES {
            let value = lookup(variable).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}
