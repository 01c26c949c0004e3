//! Chunk, embed and upload pipeline.

use std::path::Path;
use std::sync::Arc;

use ragent_qdrant::{Distance, Point, VectorStore};
use serde::{Deserialize, Serialize};

use crate::provider::Embedder;
use crate::splitter::{DocumentChunker, OwnedChunk};
use crate::{Error, Result, TRACING_TARGET_INGEST};

/// Summary of a finished ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Target collection.
    pub collection: String,
    /// Number of points uploaded (ids `0..chunks`).
    pub chunks: usize,
    /// Vector dimension.
    pub dimensions: usize,
}

/// Indexer for embedding and storing document chunks.
///
/// Runs strictly in sequence: ensure collection, chunk, embed all, upload all.
/// Any failure aborts the run and nothing is rolled back. Point ids are the
/// chunk indices, so re-ingesting into a populated collection overwrites the
/// first N points and leaves any higher ids in place.
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    chunker: DocumentChunker,
    collection: String,
}

impl Indexer {
    /// Creates a new indexer for the given collection.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chunker: DocumentChunker,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            chunker,
            collection: collection.into(),
        }
    }

    /// Returns the target collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ingests a document file.
    #[tracing::instrument(skip_all, target = TRACING_TARGET_INGEST, fields(collection = %self.collection, path = %path.display()))]
    pub async fn ingest(&self, path: &Path) -> Result<IngestReport> {
        self.prepare_collection().await?;

        let chunker = self.chunker.clone();
        let path = path.to_path_buf();
        let chunks = tokio::task::spawn_blocking(move || chunker.chunk_file(&path))
            .await
            .map_err(|e| Error::document(format!("chunking task failed: {e}")))??;

        self.index_chunks(chunks).await
    }

    /// Ingests already loaded text.
    #[tracing::instrument(skip_all, target = TRACING_TARGET_INGEST, fields(collection = %self.collection, text_len = text.len()))]
    pub async fn ingest_text(&self, text: &str) -> Result<IngestReport> {
        self.prepare_collection().await?;
        let chunks = self.chunker.split_owned(text)?;
        self.index_chunks(chunks).await
    }

    async fn prepare_collection(&self) -> Result<()> {
        let existing = self.store.collection_info(&self.collection).await?;

        self.store
            .ensure_collection(&self.collection, self.embedder.ndims(), Distance::Cosine)
            .await?;

        if let Some(info) = existing
            && info.points_count > 0
        {
            tracing::warn!(
                target: TRACING_TARGET_INGEST,
                collection = %self.collection,
                existing_points = info.points_count,
                "Collection already holds points; ids from 0 will be overwritten"
            );
        }

        Ok(())
    }

    async fn index_chunks(&self, chunks: Vec<OwnedChunk>) -> Result<IngestReport> {
        let dimensions = self.embedder.ndims();
        let texts: Vec<String> = chunks.into_iter().map(|c| c.text).collect();

        let embeddings = self.embedder.embed_texts(texts.clone()).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "embedding count mismatch: expected {}, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        let points: Vec<Point> = texts
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(id, (text, vector))| Point::with_text(id as u64, vector, text))
            .collect();
        let count = points.len();

        self.store.upload(&self.collection, points).await?;

        tracing::info!(
            target: TRACING_TARGET_INGEST,
            collection = %self.collection,
            points = count,
            dimensions,
            model = self.embedder.model_name(),
            "Ingestion completed"
        );

        Ok(IngestReport {
            collection: self.collection.clone(),
            chunks: count,
            dimensions,
        })
    }
}
