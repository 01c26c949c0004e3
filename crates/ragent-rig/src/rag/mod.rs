//! Document ingestion into the vector store.

mod config;
mod indexer;

pub use config::{DEFAULT_COLLECTION, RagConfig};
pub use indexer::{Indexer, IngestReport};
