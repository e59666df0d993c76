//! Interpretation of flow run responses

use serde_json::Value;

use crate::domain::DomainError;

/// What a flow run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowReply {
    /// Text of the first output's first result message
    Message(String),
    /// The run returned an output entry with no inner outputs
    NoResponse,
}

impl FlowReply {
    /// Reads `outputs[0].outputs[0].results.message.text`.
    ///
    /// Any other shape is a format error carrying the raw payload; only an
    /// empty inner `outputs` list is treated as "no response".
    pub fn from_response(response: &Value) -> Result<Self, DomainError> {
        let first_output = response
            .get("outputs")
            .and_then(Value::as_array)
            .and_then(|outputs| outputs.first())
            .ok_or_else(|| {
                DomainError::format("response has no 'outputs' entries", response.clone())
            })?;

        let inner = match first_output.get("outputs").and_then(Value::as_array) {
            Some(inner) if !inner.is_empty() => &inner[0],
            _ => return Ok(Self::NoResponse),
        };

        inner
            .pointer("/results/message/text")
            .and_then(Value::as_str)
            .map(|text| Self::Message(text.to_string()))
            .ok_or_else(|| {
                DomainError::format(
                    "missing 'results.message.text' in first output",
                    response.clone(),
                )
            })
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Message(text) => Some(text),
            Self::NoResponse => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_message_text() {
        let response = json!({
            "session_id": "session_001",
            "outputs": [{
                "inputs": {"input_value": "hi"},
                "outputs": [{
                    "results": {"message": {"text": "Hello! How can I help?", "sender": "Machine"}}
                }]
            }]
        });

        let reply = FlowReply::from_response(&response).unwrap();
        assert_eq!(reply, FlowReply::Message("Hello! How can I help?".into()));
    }

    #[test]
    fn test_missing_outputs_is_format_error() {
        let response = json!({"detail": "Flow not found"});

        let error = FlowReply::from_response(&response).unwrap_err();
        assert!(matches!(error, DomainError::Format { .. }));
        assert_eq!(error.payload(), Some(&response));
    }

    #[test]
    fn test_empty_outer_outputs_is_format_error() {
        let error = FlowReply::from_response(&json!({"outputs": []})).unwrap_err();
        assert!(matches!(error, DomainError::Format { .. }));
    }

    #[test]
    fn test_non_object_response_is_format_error() {
        assert!(FlowReply::from_response(&json!(null)).is_err());
        assert!(FlowReply::from_response(&json!("text")).is_err());
    }

    #[test]
    fn test_empty_inner_outputs_is_no_response() {
        let response = json!({"outputs": [{"outputs": []}]});
        assert_eq!(FlowReply::from_response(&response).unwrap(), FlowReply::NoResponse);

        let response = json!({"outputs": [{"inputs": {}}]});
        assert_eq!(FlowReply::from_response(&response).unwrap(), FlowReply::NoResponse);
    }

    #[test]
    fn test_missing_text_is_format_error() {
        let response = json!({"outputs": [{"outputs": [{"results": {"message": {}}}]}]});

        let error = FlowReply::from_response(&response).unwrap_err();
        assert!(error.to_string().contains("results.message.text"));
    }
}
