use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("{}", transport_display(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    #[error("Unexpected response format: {message}")]
    Format {
        message: String,
        payload: serde_json::Value,
    },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Initialization error: {message}")]
    Initialization { message: String },
}

fn transport_display(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => format!("Request failed: {}", message),
    }
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Transport failure before any HTTP status was received
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// Non-2xx HTTP response, keeping the server's body when there is one
    pub fn http_status(status: u16, message: impl Into<String>, body: Option<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
            body: body.filter(|b| !b.is_empty()),
        }
    }

    pub fn format(message: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Format {
            message: message.into(),
            payload,
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    /// Server response body attached to a transport error
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Transport { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Raw payload attached to a format error
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Format { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
