#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for collection operations.
pub const TRACING_TARGET_COLLECTIONS: &str = "ragent_qdrant::collections";

/// Tracing target for point uploads.
pub const TRACING_TARGET_POINTS: &str = "ragent_qdrant::points";

/// Tracing target for similarity queries.
pub const TRACING_TARGET_SEARCH: &str = "ragent_qdrant::search";

/// Tracing target for connection setup.
pub const TRACING_TARGET_CONNECTION: &str = "ragent_qdrant::connection";

mod error;
mod memory;
pub mod qdrant;
mod store;

pub use error::{Error, Result};
pub use memory::MemoryBackend;
pub use qdrant::{QdrantBackend, QdrantConfig};
pub use store::{CollectionInfo, Distance, Payload, Point, ScoredPoint, VectorStore};
