//! Flow run request types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Per-node parameter overrides, keyed by node id
pub type Tweaks = serde_json::Map<String, serde_json::Value>;

/// Opaque identifier of a remote flow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(String);

impl FlowId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(DomainError::validation("flow_id must not be empty"));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque conversation token supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `None` for a blank token, which the server should never see
    pub fn non_blank(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.trim().is_empty()).then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInputs {
    pub input_value: String,
}

/// Body of `POST /api/v1/run/{flow_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFlowRequest {
    pub inputs: RunInputs,
    pub tweaks: Tweaks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl RunFlowRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            inputs: RunInputs {
                input_value: message.into(),
            },
            tweaks: Tweaks::new(),
            session_id: None,
        }
    }

    pub fn with_tweaks(mut self, tweaks: Option<Tweaks>) -> Self {
        self.tweaks = tweaks.unwrap_or_default();
        self
    }

    pub fn with_session(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }
}

/// Node-level overrides that hand the OpenAI credentials and chat settings
/// to the flow's embedding and chat components.
pub fn openai_tweaks(api_key: &str, model_name: &str, temperature: f64) -> Tweaks {
    let mut tweaks = Tweaks::new();

    tweaks.insert(
        "OpenAIEmbeddings-1".to_string(),
        serde_json::json!({ "openai_api_key": api_key }),
    );
    tweaks.insert(
        "ChatOpenAI-1".to_string(),
        serde_json::json!({
            "openai_api_key": api_key,
            "model_name": model_name,
            "temperature": temperature,
        }),
    );

    tweaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_id_rejects_empty() {
        assert!(FlowId::new("").is_err());
        assert!(FlowId::new("   ").is_err());
        assert_eq!(FlowId::new("abc-123").unwrap().as_str(), "abc-123");
    }

    #[test]
    fn test_request_defaults_to_empty_tweaks() {
        let request = RunFlowRequest::new("Hello").with_tweaks(None);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["inputs"]["input_value"], "Hello");
        assert_eq!(json["tweaks"], serde_json::json!({}));
        assert!(json.get("session_id").is_none());
    }

    #[test]
    fn test_request_keeps_message_verbatim() {
        let message = "  spaced\tmessage with ünïcode \n";
        let request = RunFlowRequest::new(message);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["inputs"]["input_value"], message);
    }

    #[test]
    fn test_request_with_session_and_tweaks() {
        let mut tweaks = Tweaks::new();
        tweaks.insert("Node-1".into(), serde_json::json!({"k": 1}));

        let request = RunFlowRequest::new("")
            .with_tweaks(Some(tweaks))
            .with_session(Some(SessionId::new("session_001")));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["inputs"]["input_value"], "");
        assert_eq!(json["tweaks"]["Node-1"]["k"], 1);
        assert_eq!(json["session_id"], "session_001");
    }

    #[test]
    fn test_blank_session_is_dropped() {
        assert_eq!(SessionId::non_blank(""), None);
        assert_eq!(SessionId::non_blank("  "), None);
        assert_eq!(
            SessionId::non_blank("session_001").map(|s| s.as_str().to_string()),
            Some("session_001".to_string())
        );
    }

    #[test]
    fn test_openai_tweaks() {
        let tweaks = openai_tweaks("sk-test", "gpt-3.5-turbo", 0.7);

        assert_eq!(tweaks["OpenAIEmbeddings-1"]["openai_api_key"], "sk-test");
        assert_eq!(tweaks["ChatOpenAI-1"]["openai_api_key"], "sk-test");
        assert_eq!(tweaks["ChatOpenAI-1"]["model_name"], "gpt-3.5-turbo");
        assert!(tweaks["ChatOpenAI-1"]
            .to_string()
            .contains(r#""temperature":0.7"#));
    }
}
