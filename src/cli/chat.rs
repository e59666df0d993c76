//! Interactive and scripted conversation drivers
//!
//! Both drivers talk to a `ChatBackend` and write the transcript to any
//! `Write`, so the same loops serve the remote flow and the standalone
//! pipeline.

use std::future::Future;
use std::io::{self, Write};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::{info, warn};

use super::input::LineSource;

use crate::domain::flow::{FlowClient, FlowId, FlowReply, SessionId, Tweaks};
use crate::domain::DomainError;
use crate::infrastructure::rag::RagPipeline;

pub const REMOTE_TITLE: &str = "ACME Corp Customer Support Chatbot";
pub const STANDALONE_TITLE: &str = "ACME Corp Customer Support Chatbot (Standalone Mode)";
pub const TEST_TITLE: &str = "Testing Customer Support Chatbot";

pub const FAREWELL: &str = "Thank you for contacting ACME Corp! Have a great day!";
pub const NO_RESPONSE: &str = "I apologize, but I couldn't generate a response. Please try again.";
pub const NO_TEST_RESPONSE: &str = "Could not generate response";

/// Session token the interactive remote driver uses unless told otherwise
pub const DEFAULT_SESSION: &str = "session_001";

pub const TEST_QUESTIONS: [&str; 5] = [
    "What is the price of SmartWidget Pro?",
    "How do I reset my device?",
    "What is your return policy?",
    "How long does shipping take?",
    "My device won't connect to WiFi, what should I do?",
];

const RETRY_HINT: &str = "Please try again or type 'quit' to exit.";
const RULE_WIDTH: usize = 60;
const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "bye"];

/// Something that answers one user message
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `None` when the backend ran but produced no answer
    async fn reply(&self, input: &str) -> Result<Option<String>, DomainError>;
}

/// Answers through a remote flow
#[derive(Debug)]
pub struct FlowChatBackend<F: FlowClient> {
    client: F,
    flow_id: FlowId,
    tweaks: Tweaks,
    session_id: Option<SessionId>,
}

impl<F: FlowClient> FlowChatBackend<F> {
    pub fn new(client: F, flow_id: FlowId, tweaks: Tweaks) -> Self {
        Self {
            client,
            flow_id,
            tweaks,
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: Option<SessionId>) -> Self {
        self.session_id = session_id;
        self
    }
}

#[async_trait]
impl<F: FlowClient> ChatBackend for FlowChatBackend<F> {
    async fn reply(&self, input: &str) -> Result<Option<String>, DomainError> {
        let response = self
            .client
            .run_flow(
                self.flow_id.as_str(),
                input,
                Some(self.tweaks.clone()),
                self.session_id.clone(),
            )
            .await?;

        Ok(FlowReply::from_response(&response)?.into_text())
    }
}

/// Answers from the local retrieval pipeline
#[derive(Debug)]
pub struct RagChatBackend {
    pipeline: RagPipeline,
}

impl RagChatBackend {
    pub fn new(pipeline: RagPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl ChatBackend for RagChatBackend {
    async fn reply(&self, input: &str) -> Result<Option<String>, DomainError> {
        self.pipeline.ask(input).await.map(Some)
    }
}

/// Outcome counts of a scripted run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub answered: usize,
    pub unanswered: usize,
    pub failed: usize,
}

impl TestSummary {
    pub fn total(&self) -> usize {
        self.answered + self.unanswered + self.failed
    }
}

pub fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|command| input.eq_ignore_ascii_case(command))
}

fn print_banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")
}

/// Read-reply loop until an exit command, end of input or `interrupt` fires
pub async fn run_interactive<B, L, W, I>(
    backend: &B,
    mut input: L,
    out: &mut W,
    interrupt: I,
    title: &str,
) -> io::Result<()>
where
    B: ChatBackend + ?Sized,
    L: LineSource,
    W: Write,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    print_banner(out, title)?;
    writeln!(out, "Ask me anything about our products and services!")?;
    writeln!(out, "Type 'quit' or 'exit' to end the conversation.")?;
    writeln!(out)?;

    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let line = tokio::select! {
            _ = &mut interrupt => {
                writeln!(out, "\n\n{FAREWELL}")?;
                return Ok(());
            }
            line = input.next_line() => line?,
        };

        let Some(line) = line else {
            writeln!(out, "\n{FAREWELL}")?;
            return Ok(());
        };

        let line = match String::from_utf8(line) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Unreadable input line");
                writeln!(out, "\nError: {e}")?;
                writeln!(out, "{RETRY_HINT}")?;
                writeln!(out)?;
                continue;
            }
        };

        let message = line.trim();

        if message.is_empty() {
            continue;
        }

        if is_exit_command(message) {
            writeln!(out, "\n{FAREWELL}")?;
            return Ok(());
        }

        write!(out, "Bot: ")?;
        out.flush()?;

        let reply = tokio::select! {
            _ = &mut interrupt => {
                writeln!(out, "\n\n{FAREWELL}")?;
                return Ok(());
            }
            reply = backend.reply(message) => reply,
        };

        match reply {
            Ok(Some(text)) => writeln!(out, "{text}")?,
            Ok(None) => writeln!(out, "{NO_RESPONSE}")?,
            Err(e) => {
                warn!(error = %e, "Chat turn failed");
                writeln!(out, "\nError: {e}")?;
                if let Some(payload) = e.payload() {
                    writeln!(out, "Response: {payload}")?;
                }
                writeln!(out, "{RETRY_HINT}")?;
            }
        }

        writeln!(out)?;
    }
}

/// Ask each question once, in order; failures are reported and skipped
pub async fn run_scripted<B, W>(
    backend: &B,
    questions: &[&str],
    out: &mut W,
) -> io::Result<TestSummary>
where
    B: ChatBackend + ?Sized,
    W: Write,
{
    let mut summary = TestSummary::default();

    print_banner(out, TEST_TITLE)?;
    writeln!(out)?;

    for (i, question) in questions.iter().enumerate() {
        writeln!(out, "Test {}/{}", i + 1, questions.len())?;
        writeln!(out, "Question: {question}")?;

        match backend.reply(question).await {
            Ok(Some(answer)) => {
                summary.answered += 1;
                writeln!(out, "Answer: {answer}")?;
            }
            Ok(None) => {
                summary.unanswered += 1;
                writeln!(out, "Answer: {NO_TEST_RESPONSE}")?;
            }
            Err(e) => {
                summary.failed += 1;
                warn!(question = %question, error = %e, "Test question failed");
                writeln!(out, "Error: {e}")?;
            }
        }

        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out)?;
        out.flush()?;
    }

    info!(
        answered = summary.answered,
        unanswered = summary.unanswered,
        failed = summary.failed,
        "Test run finished"
    );

    Ok(summary)
}
