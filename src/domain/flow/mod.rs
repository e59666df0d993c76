//! Remote flow domain types

mod client;
mod reply;
mod request;

pub use client::FlowClient;
pub use reply::FlowReply;
pub use request::{openai_tweaks, FlowId, RunFlowRequest, RunInputs, SessionId, Tweaks};

#[cfg(test)]
pub use client::MockFlowClient;
