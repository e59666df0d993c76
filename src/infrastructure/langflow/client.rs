//! LangFlow REST client

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::LangflowConfig;
use crate::domain::flow::{FlowClient, FlowId, RunFlowRequest, SessionId, Tweaks};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Client for the LangFlow `/api/v1` surface
#[derive(Debug)]
pub struct LangflowClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> LangflowClient<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: None,
        }
    }

    pub fn from_config(client: C, config: &LangflowConfig) -> Self {
        Self::new(client, config.base_url()).with_api_key(config.api_key.clone())
    }

    /// Sends `Authorization: Bearer <key>` on every request when set
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.auth_header = api_key
            .filter(|key| !key.is_empty())
            .map(|key| format!("Bearer {}", key));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn run_url(&self, flow_id: &FlowId) -> String {
        format!("{}/api/v1/run/{}", self.base_url, flow_id)
    }

    fn flows_url(&self) -> String {
        format!("{}/api/v1/flows", self.base_url)
    }

    fn flow_url(&self, flow_id: &FlowId) -> String {
        format!("{}/api/v1/flows/{}", self.base_url, flow_id)
    }

    fn upload_url(&self) -> String {
        format!("{}/api/v1/flows/upload", self.base_url)
    }
}

/// Logs a failed call with the server's body, then hands the error back
fn log_failure(operation: &str, err: DomainError) -> DomainError {
    match err.response_body() {
        Some(body) => error!(operation, error = %err, response = body, "LangFlow request failed"),
        None => error!(operation, error = %err, "LangFlow request failed"),
    }
    err
}

#[async_trait]
impl<C: HttpClientTrait> FlowClient for LangflowClient<C> {
    async fn run_flow(
        &self,
        flow_id: &str,
        message: &str,
        tweaks: Option<Tweaks>,
        session_id: Option<SessionId>,
    ) -> Result<serde_json::Value, DomainError> {
        let flow_id = FlowId::new(flow_id)?;
        let request = RunFlowRequest::new(message)
            .with_tweaks(tweaks)
            .with_session(session_id);

        let body = serde_json::to_value(&request)
            .map_err(|e| DomainError::parse(format!("Failed to encode run request: {}", e)))?;

        debug!(flow_id = %flow_id, "Running flow");

        self.client
            .post_json(&self.run_url(&flow_id), self.headers(), &body)
            .await
            .map_err(|e| log_failure("run flow", e))
    }

    async fn upload_flow(&self, path: &Path) -> Result<serde_json::Value, DomainError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DomainError::not_found(format!("Flow file {} does not exist", path.display()))
            } else {
                DomainError::parse(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;

        let flow_data: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            DomainError::parse(format!("{} is not valid JSON: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Uploading flow");

        self.client
            .post_json(&self.upload_url(), self.headers(), &flow_data)
            .await
            .map_err(|e| log_failure("upload flow", e))
    }

    async fn list_flows(&self) -> Result<serde_json::Value, DomainError> {
        self.client
            .get_json(&self.flows_url(), self.headers())
            .await
            .map_err(|e| log_failure("list flows", e))
    }

    async fn get_flow(&self, flow_id: &str) -> Result<serde_json::Value, DomainError> {
        let flow_id = FlowId::new(flow_id)?;

        self.client
            .get_json(&self.flow_url(&flow_id), self.headers())
            .await
            .map_err(|e| log_failure("get flow", e))
    }

    async fn delete_flow(&self, flow_id: &str) -> Result<serde_json::Value, DomainError> {
        let flow_id = FlowId::new(flow_id)?;

        self.client
            .delete_json(&self.flow_url(&flow_id), self.headers())
            .await
            .map_err(|e| log_failure("delete flow", e))
    }
}
