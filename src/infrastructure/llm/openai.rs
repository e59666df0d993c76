use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse, Message, Usage};
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const PROVIDER: &str = "openai";

/// Chat model behind an OpenAI-compatible `/v1/chat/completions` endpoint
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    endpoint: String,
    authorization: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// `base_url` is the host root; a trailing slash is ignored
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();

        Self {
            client,
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            authorization: format!("Bearer {}", api_key.into()),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let body = serde_json::to_value(CompletionBody {
            model,
            messages: &request.messages,
            temperature: request.temperature,
        })
        .map_err(|e| DomainError::provider(PROVIDER, format!("Failed to encode request: {}", e)))?;

        let headers = vec![
            ("Authorization", self.authorization.as_str()),
            ("Content-Type", "application/json"),
        ];
        let json = self.client.post_json(&self.endpoint, headers, &body).await?;

        let completion: Completion = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        completion.into_response()
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// Message serializes as `{"role": "...", "content": "..."}`, the wire shape
#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Deserialize)]
struct Completion {
    model: String,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl Completion {
    fn into_response(self) -> Result<LlmResponse, DomainError> {
        let Some(choice) = self.choices.into_iter().next() else {
            return Err(DomainError::provider(PROVIDER, "No choices in response"));
        };

        let mut response = LlmResponse::new(
            self.model,
            Message::assistant(choice.message.content.unwrap_or_default()),
        );
        response.finish_reason = choice.finish_reason;
        response.usage = self.usage;

        Ok(response)
    }
}
