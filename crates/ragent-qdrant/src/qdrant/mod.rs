//! Qdrant vector store backend.

mod backend;
mod config;
mod value;

pub use backend::QdrantBackend;
pub use config::QdrantConfig;
