//! LangFlow service integration

mod client;

pub use client::LangflowClient;
