//! Qdrant backend implementation.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::with_payload_selector::SelectorOptions;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance as QdrantDistance, PointId, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};

use super::QdrantConfig;
use super::value::{payload_from_qdrant, payload_to_qdrant};
use crate::{
    CollectionInfo, Distance, Error, Point, Result, ScoredPoint, TRACING_TARGET_COLLECTIONS,
    TRACING_TARGET_CONNECTION, TRACING_TARGET_POINTS, TRACING_TARGET_SEARCH, VectorStore,
};

/// Points sent per upsert request.
const UPSERT_CHUNK_SIZE: usize = 64;

/// Qdrant backend over gRPC.
pub struct QdrantBackend {
    client: Qdrant,
    config: QdrantConfig,
}

impl QdrantBackend {
    /// Builds a client for the configured server.
    ///
    /// The gRPC channel is established lazily, so an unreachable server surfaces
    /// on the first operation rather than here.
    pub fn connect(config: &QdrantConfig) -> Result<Self> {
        config.validate()?;

        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::connection(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET_CONNECTION,
            url = %config.url,
            authenticated = config.api_key.is_some(),
            "Qdrant client created"
        );

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Returns the configuration this backend was built with.
    pub fn config(&self) -> &QdrantConfig {
        &self.config
    }
}

impl std::fmt::Debug for QdrantBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantBackend")
            .field("url", &self.config.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VectorStore for QdrantBackend {
    fn backend_name(&self) -> &'static str {
        "qdrant"
    }

    async fn collection_info(&self, name: &str) -> Result<Option<CollectionInfo>> {
        if !self.client.collection_exists(name).await? {
            return Ok(None);
        }

        let response = self.client.collection_info(name).await?;
        let info = response
            .result
            .ok_or_else(|| Error::backend(format!("no info returned for '{name}'")))?;

        let vectors = info
            .config
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config);

        let params = match vectors {
            Some(VectorsConfig::Params(params)) => params,
            Some(VectorsConfig::ParamsMap(_)) => {
                return Err(Error::backend(format!(
                    "collection '{name}' uses named vectors"
                )));
            }
            None => {
                return Err(Error::backend(format!(
                    "collection '{name}' has no vector configuration"
                )));
            }
        };

        Ok(Some(CollectionInfo {
            name: name.to_owned(),
            dimensions: params.size as usize,
            distance: distance_from_qdrant(params.distance)?,
            points_count: info.points_count.unwrap_or_default(),
        }))
    }

    #[tracing::instrument(skip(self), target = TRACING_TARGET_COLLECTIONS)]
    async fn ensure_collection(
        &self,
        name: &str,
        dimensions: usize,
        distance: Distance,
    ) -> Result<()> {
        if let Some(existing) = self.collection_info(name).await? {
            existing.ensure_compatible(dimensions, distance)?;
            tracing::debug!(
                target: TRACING_TARGET_COLLECTIONS,
                collection = %name,
                points = existing.points_count,
                "Collection already exists"
            );
            return Ok(());
        }

        let vectors_config = VectorsConfig::Params(
            VectorParamsBuilder::new(dimensions as u64, distance_to_qdrant(distance)).build(),
        );
        self.client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(vectors_config))
            .await?;

        tracing::info!(
            target: TRACING_TARGET_COLLECTIONS,
            collection = %name,
            dimensions,
            %distance,
            "Created Qdrant collection"
        );

        Ok(())
    }

    async fn upload(&self, collection: &str, points: Vec<Point>) -> Result<()> {
        let info = self
            .collection_info(collection)
            .await?
            .ok_or_else(|| Error::collection_not_found(collection))?;
        info.ensure_accepts(&points)?;

        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| PointStruct::new(p.id, p.vector, payload_to_qdrant(p.payload)))
            .collect();

        self.client
            .upsert_points_chunked(
                UpsertPointsBuilder::new(collection, points).wait(true),
                UPSERT_CHUNK_SIZE,
            )
            .await?;

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
        if limit == 0 {
            return Ok(Vec::new());
        }

        let search = SearchPointsBuilder::new(collection, vector, limit as u64)
            .with_payload(SelectorOptions::Enable(true));

        let response = self.client.search_points(search).await.map_err(|e| {
            let message = e.to_string();
            if message.contains("Not found") || message.contains("doesn't exist") {
                Error::collection_not_found(collection)
            } else {
                Error::backend(message)
            }
        })?;

        let results = response
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredPoint {
                    id: point_id(point.id)?,
                    score: point.score,
                    payload: payload_from_qdrant(point.payload),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            target: TRACING_TARGET_SEARCH,
            collection = %collection,
            limit,
            hits = results.len(),
            "Search completed"
        );

        Ok(results)
    }
}

fn distance_to_qdrant(distance: Distance) -> QdrantDistance {
    match distance {
        Distance::Cosine => QdrantDistance::Cosine,
        Distance::Dot => QdrantDistance::Dot,
        Distance::Euclid => QdrantDistance::Euclid,
    }
}

fn distance_from_qdrant(raw: i32) -> Result<Distance> {
    match QdrantDistance::try_from(raw) {
        Ok(QdrantDistance::Cosine) => Ok(Distance::Cosine),
        Ok(QdrantDistance::Dot) => Ok(Distance::Dot),
        Ok(QdrantDistance::Euclid) => Ok(Distance::Euclid),
        _ => Err(Error::backend(format!("unsupported distance metric: {raw}"))),
    }
}

fn point_id(id: Option<PointId>) -> Result<u64> {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Num(n)) => Ok(n),
        Some(PointIdOptions::Uuid(uuid)) => {
            Err(Error::backend(format!("unexpected uuid point id: {uuid}")))
        }
        None => Err(Error::backend("point without id")),
    }
}
