//! Retrieval-augmented question answering over a local knowledge base
//!
//! - `RetrievalQaChain` embeds a question, retrieves the closest chunks and
//!   asks the chat model with those chunks stuffed into the prompt
//! - `RagPipeline` builds the chain from a knowledge-base file, reusing the
//!   persisted index when the source has not changed

mod chain;
mod pipeline;

pub use chain::{QaResult, RetrievalQaChain, PROMPT_TEMPLATE};
pub use pipeline::{index_fingerprint, RagPipeline, RagSettings};
