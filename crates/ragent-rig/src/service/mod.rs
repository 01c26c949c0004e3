//! Wiring of store, embedder and agent.

mod config;

use std::sync::Arc;

pub use config::{
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, DEFAULT_OLLAMA_BASE_URL,
    EmbeddingBackend, RigConfig,
};
use ragent_qdrant::VectorStore;
use rig::completion::CompletionModel;

use crate::Result;
use crate::agent::{AgentConfig, RagAgent, SearchTool};
use crate::provider::{Embedder, LazyEmbedder};
use crate::rag::{Indexer, RagConfig};

struct RigServiceInner {
    store: Arc<dyn VectorStore>,
    embedder: Arc<LazyEmbedder>,
    rag: RagConfig,
}

/// Entry point tying the vector store and the embedding model together.
///
/// The embedding model is shared by ingestion and retrieval and is loaded at
/// most once per service. This type is cheap to clone.
#[derive(Clone)]
pub struct RigService {
    inner: Arc<RigServiceInner>,
}

impl RigService {
    /// Creates a service from its parts.
    pub fn new(store: Arc<dyn VectorStore>, embedder: LazyEmbedder, rag: RagConfig) -> Self {
        Self {
            inner: Arc::new(RigServiceInner {
                store,
                embedder: Arc::new(embedder),
                rag,
            }),
        }
    }

    /// Creates a service from configuration.
    pub fn from_config(config: &RigConfig, store: Arc<dyn VectorStore>) -> Result<Self> {
        let embedder = config.lazy_embedder()?;
        Ok(Self::new(store, embedder, config.rag.clone()))
    }

    /// Returns the vector store.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.inner.store
    }

    /// Returns the memoized embedder.
    pub fn embedder(&self) -> &LazyEmbedder {
        &self.inner.embedder
    }

    /// Returns the retrieval settings.
    pub fn rag_config(&self) -> &RagConfig {
        &self.inner.rag
    }

    fn shared_embedder(&self) -> Arc<dyn Embedder> {
        self.inner.embedder.clone()
    }

    /// Builds the ingestion pipeline.
    pub fn indexer(&self) -> Result<Indexer> {
        Ok(Indexer::new(
            self.inner.store.clone(),
            self.shared_embedder(),
            self.inner.rag.chunker()?,
            &self.inner.rag.collection,
        ))
    }

    /// Builds the retrieval tool.
    pub fn search_tool(&self) -> SearchTool {
        SearchTool::new(
            self.inner.store.clone(),
            self.shared_embedder(),
            &self.inner.rag.collection,
        )
        .with_limit(self.inner.rag.search_limit)
    }

    /// Builds an agent on `model` with the retrieval tool registered.
    pub fn agent<M>(&self, model: M, config: AgentConfig) -> Result<RagAgent<M>>
    where
        M: CompletionModel + 'static,
    {
        RagAgent::new(model, self.search_tool(), config)
    }
}

impl std::fmt::Debug for RigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigService")
            .field("store", &self.inner.store.backend_name())
            .field("embedder", &self.inner.embedder)
            .field("rag", &self.inner.rag)
            .finish()
    }
}
