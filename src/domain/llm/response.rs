use serde::{Deserialize, Serialize};

use super::Message;

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A chat completion result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub model: String,
    pub message: Message,
    /// Provider's stop reason, e.g. `stop` or `length`
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl LlmResponse {
    pub fn new(model: impl Into<String>, message: Message) -> Self {
        Self {
            model: model.into(),
            message,
            finish_reason: None,
            usage: None,
        }
    }

    pub fn content(&self) -> &str {
        self.message.content_text()
    }

    /// The answer was cut off by the token limit
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_and_usage() {
        let mut response = LlmResponse::new("gpt-3.5-turbo", Message::assistant("Our return"));
        assert!(!response.is_truncated());

        response.finish_reason = Some("length".to_string());
        response.usage = Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 20,
        });

        assert!(response.is_truncated());
        assert_eq!(response.usage.unwrap().total(), 30);
        assert_eq!(response.content(), "Our return");
    }
}
