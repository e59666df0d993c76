//! Document ingestion infrastructure
//!
//! Loading a knowledge-base file and splitting it into chunks.

mod character_splitter;
mod text_loader;

pub use character_splitter::CharacterTextSplitter;
pub use text_loader::TextLoader;
