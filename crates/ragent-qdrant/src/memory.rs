//! In-process vector store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    CollectionInfo, Distance, Error, Point, Result, ScoredPoint, TRACING_TARGET_COLLECTIONS,
    TRACING_TARGET_POINTS, VectorStore,
};

struct MemoryCollection {
    dimensions: usize,
    distance: Distance,
    points: BTreeMap<u64, Point>,
}

impl MemoryCollection {
    fn info(&self, name: &str) -> CollectionInfo {
        CollectionInfo {
            name: name.to_owned(),
            dimensions: self.dimensions,
            distance: self.distance,
            points_count: self.points.len() as u64,
        }
    }
}

/// Vector store that keeps every collection in memory.
///
/// Scores follow Qdrant's conventions: cosine and dot are similarities (higher is
/// closer), euclid is a distance (lower is closer). Cheap to clone; clones share
/// the same collections.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    collections: Arc<RwLock<HashMap<String, MemoryCollection>>>,
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the names of all collections.
    pub async fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns a stored point by id.
    pub async fn point(&self, collection: &str, id: u64) -> Option<Point> {
        let collections = self.collections.read().await;
        collections.get(collection)?.points.get(&id).cloned()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend").finish_non_exhaustive()
    }
}

#[async_trait]
impl VectorStore for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>> {
        let collections = self.collections.read().await;
        Ok(collections.get(name).map(|c| c.info(name)))
    }

    async fn ensure_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: Distance,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;

        if let Some(existing) = collections.get(name) {
            return existing.info(name).ensure_compatible(dimensions, distance);
        }

        collections.insert(
            name.to_owned(),
            MemoryCollection {
                dimensions,
                distance,
                points: BTreeMap::new(),
            },
        );

        tracing::info!(
            target: TRACING_TARGET_COLLECTIONS,
            collection = %name,
            dimensions,
            %distance,
            "Created in-memory collection"
        );

        Ok(())
    }

    async fn upload(&self, collection: &str, points: Vec<Point>) -> Result<()> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| Error::collection_not_found(collection))?;

        target.info(collection).ensure_accepts(&points)?;

        let count = points.len();
        for point in points {
            target.points.insert(point.id, point);
        }

        tracing::debug!(
            target: TRACING_TARGET_POINTS,
            collection = %collection,
            count,
            "Upserted points"
        );

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>> {
        let collections = self.collections.read().await;
        let source = collections
            .get(collection)
            .ok_or_else(|| Error::collection_not_found(collection))?;

        if vector.len() != source.dimensions {
            return Err(Error::dimension_mismatch(
                collection,
                source.dimensions,
                vector.len(),
            ));
        }

        let mut scored: Vec<ScoredPoint> = source
            .points
            .values()
            .map(|point| ScoredPoint {
                id: point.id,
                score: score(source.distance, &vector, &point.vector),
                payload: point.payload.clone(),
            })
            .collect();

        if source.distance.higher_is_better() {
            scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        } else {
            scored.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.id.cmp(&b.id)));
        }
        scored.truncate(limit);

        Ok(scored)
    }
}

fn score(distance: Distance, a: &[f32], b: &[f32]) -> f32 {
    match distance {
        Distance::Cosine => {
            let norm_a = dot(a, a).sqrt();
            let norm_b = dot(b, b).sqrt();
            if norm_a == 0.0 || norm_b == 0.0 {
                0.0
            } else {
                dot(a, b) / (norm_a * norm_b)
            }
        }
        Distance::Dot => dot(a, b),
        Distance::Euclid => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
