#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod agent;
mod error;
pub mod provider;
pub mod rag;
mod service;
pub mod splitter;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use service::{
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, DEFAULT_OLLAMA_BASE_URL,
    EmbeddingBackend, RigConfig, RigService,
};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "ragent_rig";

/// Tracing target for document ingestion.
pub const TRACING_TARGET_INGEST: &str = "ragent_rig::ingest";

/// Tracing target for agent and tool activity.
pub const TRACING_TARGET_AGENT: &str = "ragent_rig::agent";
