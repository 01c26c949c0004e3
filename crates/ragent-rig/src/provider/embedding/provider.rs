//! Rig-backed embedding provider.

use std::sync::Arc;

use async_trait::async_trait;
use rig::client::Nothing;
use rig::embeddings::{Embedding, EmbeddingModel as RigEmbeddingModel};
use rig::prelude::EmbeddingsClient;
use rig::providers::{ollama, openai};

use super::{Embedder, EmbeddingModel, OllamaEmbeddingModel, OpenAiEmbeddingModel};
use crate::{Error, Result, TRACING_TARGET};

/// Maximum documents sent in a single embedding request.
///
/// This is a conservative default; individual providers may support more.
pub(crate) const DEFAULT_MAX_DOCUMENTS: usize = 96;

/// Embedding provider that wraps different rig embedding model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<EmbeddingService>`.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<EmbeddingService>);

enum EmbeddingService {
    Ollama {
        client: ollama::Client,
        model: OllamaEmbeddingModel,
    },
    OpenAi {
        model: openai::EmbeddingModel,
        reference: OpenAiEmbeddingModel,
    },
}

impl EmbeddingProvider {
    /// Creates a provider for an Ollama server.
    pub fn ollama(base_url: &str, model: OllamaEmbeddingModel) -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| Error::provider("ollama", e))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url,
            model = %model.name,
            ndims = model.dimensions,
            "Created Ollama embedding provider"
        );

        Ok(Self(Arc::new(EmbeddingService::Ollama { client, model })))
    }

    /// Creates a provider for the OpenAI embeddings API.
    pub fn openai(api_key: &str, model: OpenAiEmbeddingModel) -> Result<Self> {
        let client = openai::Client::new(api_key).map_err(|e| Error::provider("openai", e))?;
        let embedding = client.embedding_model_with_ndims(model.as_str(), model.dimensions());

        tracing::debug!(
            target: TRACING_TARGET,
            model = model.as_str(),
            ndims = model.dimensions(),
            "Created OpenAI embedding provider"
        );

        Ok(Self(Arc::new(EmbeddingService::OpenAi {
            model: embedding,
            reference: model,
        })))
    }

    /// Creates a provider for a model reference.
    ///
    /// OpenAI models require an API key; Ollama models require a base URL.
    pub fn connect(
        model: &EmbeddingModel,
        ollama_base_url: &str,
        openai_api_key: Option<&str>,
    ) -> Result<Self> {
        match model {
            EmbeddingModel::Ollama(m) => Self::ollama(ollama_base_url, m.clone()),
            EmbeddingModel::OpenAi(m) => {
                let key = openai_api_key
                    .ok_or_else(|| Error::config("OpenAI embeddings require an API key"))?;
                Self::openai(key, *m)
            }
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            EmbeddingService::Ollama { .. } => "ollama",
            EmbeddingService::OpenAi { .. } => "openai",
        }
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let result = match self.0.as_ref() {
            EmbeddingService::Ollama { client, model } => {
                let embedding_model =
                    ollama::EmbeddingModel::new(client.clone(), &model.name, model.dimensions);
                embedding_model.embed_texts(texts).await
            }
            EmbeddingService::OpenAi { model, .. } => model.embed_texts(texts).await,
        };

        result.map_err(|e| Error::provider(self.provider_name(), e))
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingService::Ollama { model, .. } => &model.name,
            EmbeddingService::OpenAi { reference, .. } => reference.as_str(),
        }
    }

    fn ndims(&self) -> usize {
        match self.0.as_ref() {
            EmbeddingService::Ollama { model, .. } => model.dimensions,
            EmbeddingService::OpenAi { reference, .. } => reference.dimensions(),
        }
    }

    async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let ndims = self.ndims();
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(DEFAULT_MAX_DOCUMENTS) {
            let embeddings = self.embed_batch(batch.to_vec()).await?;

            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "embedding count mismatch: expected {}, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            for embedding in embeddings {
                if embedding.vec.len() != ndims {
                    return Err(Error::embedding(format!(
                        "model '{}' returned {} dimensions, expected {ndims}",
                        self.model_name(),
                        embedding.vec.len()
                    )));
                }
                // Qdrant stores single precision.
                vectors.push(embedding.vec.into_iter().map(|x| x as f32).collect());
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            provider = self.provider_name(),
            count = vectors.len(),
            "Embedded texts"
        );

        Ok(vectors)
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("ndims", &self.ndims())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ollama_provider_reports_model() {
        let provider = EmbeddingProvider::ollama(
            "http://localhost:11434",
            OllamaEmbeddingModel::nomic_embed_text(),
        )
        .unwrap();

        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "nomic-embed-text");
        assert_eq!(provider.ndims(), 768);
    }

    #[test]
    fn openai_model_without_key_is_rejected() {
        let model = EmbeddingModel::OpenAi(OpenAiEmbeddingModel::TextEmbedding3Small);
        let result = EmbeddingProvider::connect(&model, "http://localhost:11434", None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn empty_input_skips_the_network() {
        let provider = EmbeddingProvider::ollama(
            "http://localhost:1",
            OllamaEmbeddingModel::new("all-minilm", 384),
        )
        .unwrap();

        assert!(provider.embed_texts(Vec::new()).await.unwrap().is_empty());
    }
}
