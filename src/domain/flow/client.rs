//! Flow service client trait

use std::path::Path;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{SessionId, Tweaks};
use crate::domain::DomainError;

/// CRUD and execution operations against a remote flow service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FlowClient: Send + Sync {
    /// Executes `flow_id` with `message` as its input value
    async fn run_flow(
        &self,
        flow_id: &str,
        message: &str,
        tweaks: Option<Tweaks>,
        session_id: Option<SessionId>,
    ) -> Result<serde_json::Value, DomainError>;

    /// Uploads a flow definition read from a local JSON file
    async fn upload_flow(&self, path: &Path) -> Result<serde_json::Value, DomainError>;

    async fn list_flows(&self) -> Result<serde_json::Value, DomainError>;

    async fn get_flow(&self, flow_id: &str) -> Result<serde_json::Value, DomainError>;

    async fn delete_flow(&self, flow_id: &str) -> Result<serde_json::Value, DomainError>;
}
