//! Vector store trait and the point types it moves around.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// Point payload: arbitrary JSON fields keyed by name.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Payload key holding the chunk text.
const TEXT_FIELD: &str = "text";

/// Similarity metric a collection is configured with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Distance {
    /// Cosine similarity, higher is closer.
    #[default]
    Cosine,
    /// Dot product, higher is closer.
    Dot,
    /// Euclidean distance, lower is closer.
    Euclid,
}

impl Distance {
    /// Returns whether a higher score means a closer match.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, Self::Euclid)
    }
}

/// A stored `(id, vector, payload)` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Identifier, unique within a collection.
    pub id: u64,
    /// The embedding vector.
    pub vector: Vec<f32>,
    /// Associated payload.
    #[serde(default)]
    pub payload: Payload,
}

impl Point {
    /// Creates a point with an empty payload.
    pub fn new(id: u64, vector: Vec<f32>) -> Self {
        Self {
            id,
            vector,
            payload: Payload::new(),
        }
    }

    /// Creates a point whose payload carries a single `text` field.
    pub fn with_text(id: u64, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self::new(id, vector).with_field(TEXT_FIELD, serde_json::Value::String(text.into()))
    }

    /// Adds a single payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Returns the `text` payload field, if present.
    pub fn text(&self) -> Option<&str> {
        self.payload.get(TEXT_FIELD).and_then(|v| v.as_str())
    }
}

/// A point returned by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// Point identifier.
    pub id: u64,
    /// Similarity score under the collection's metric.
    pub score: f32,
    /// Associated payload.
    #[serde(default)]
    pub payload: Payload,
}

impl ScoredPoint {
    /// Returns the `text` payload field, if present.
    pub fn text(&self) -> Option<&str> {
        self.payload.get(TEXT_FIELD).and_then(|v| v.as_str())
    }
}

/// Shape of an existing collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Configured vector dimension.
    pub dimensions: usize,
    /// Configured distance metric.
    pub distance: Distance,
    /// Number of stored points.
    pub points_count: u64,
}

impl CollectionInfo {
    /// Checks that this collection can hold vectors of the requested shape.
    pub fn ensure_compatible(&self, dimensions: usize, distance: Distance) -> Result<()> {
        if self.dimensions != dimensions {
            return Err(Error::dimension_mismatch(
                &self.name,
                self.dimensions,
                dimensions,
            ));
        }

        if self.distance != distance {
            return Err(Error::distance_mismatch(&self.name, self.distance, distance));
        }

        Ok(())
    }

    /// Checks that every point has this collection's vector dimension.
    pub fn ensure_accepts(&self, points: &[Point]) -> Result<()> {
        match points.iter().find(|p| p.vector.len() != self.dimensions) {
            Some(bad) => Err(Error::dimension_mismatch(
                &self.name,
                self.dimensions,
                bad.vector.len(),
            )),
            None => Ok(()),
        }
    }
}

/// Trait for vector store backends.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns a short backend name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Returns the shape of a collection, or `None` when it does not exist.
    async fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>>;

    /// Creates the collection if absent.
    ///
    /// Calling this on an existing collection with the same dimension and metric is
    /// a no-op. A collection that exists with another shape yields
    /// [`Error::DimensionMismatch`] or [`Error::DistanceMismatch`].
    async fn ensure_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: Distance,
    ) -> Result<()>;

    /// Upserts points, overwriting any point that shares an id.
    ///
    /// The collection must exist, even when `points` is empty, and every vector
    /// must match its dimension. Otherwise nothing is written and the call yields
    /// [`Error::CollectionNotFound`] or [`Error::DimensionMismatch`].
    async fn upload(&self, collection: &str, points: Vec<Point>) -> Result<()>;

    /// Returns the `limit` closest points, best match first.
    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>>;
}
