//! Vector store implementations

mod persistent;

pub use persistent::PersistentVectorStore;
