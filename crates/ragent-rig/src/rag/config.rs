//! Retrieval pipeline configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::agent::tool::DEFAULT_SEARCH_LIMIT;
use crate::splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DocumentChunker};

/// Collection that holds the policy chunks.
pub const DEFAULT_COLLECTION: &str = "agentic_ai_power_workshop";

/// Configuration shared by ingestion and retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RagConfig {
    /// Vector store collection name
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QDRANT_COLLECTION", default_value = DEFAULT_COLLECTION)
    )]
    pub collection: String,

    /// Maximum chunk size in characters
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)
    )]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CHUNK_OVERLAP", default_value_t = DEFAULT_CHUNK_OVERLAP)
    )]
    pub chunk_overlap: usize,

    /// Number of chunks returned per search
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SEARCH_LIMIT", default_value_t = DEFAULT_SEARCH_LIMIT)
    )]
    pub search_limit: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_owned(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl RagConfig {
    /// Builds the chunker for these settings.
    pub fn chunker(&self) -> Result<DocumentChunker> {
        DocumentChunker::new(self.chunk_size, self.chunk_overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RagConfig::default();
        assert_eq!(config.collection, "agentic_ai_power_workshop");
        assert_eq!(config.chunk_size, 350);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.search_limit, 5);
    }

    #[test]
    fn invalid_overlap_fails_chunker() {
        let config = RagConfig {
            chunk_overlap: 400,
            ..RagConfig::default()
        };
        assert!(config.chunker().is_err());
    }
}
