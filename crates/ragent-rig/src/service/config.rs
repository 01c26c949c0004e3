//! Configuration for the rig service.

use std::sync::Arc;

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::provider::{
    Embedder, EmbeddingModel, EmbeddingProvider, LazyEmbedder, OllamaEmbeddingModel,
    OpenAiEmbeddingModel,
};
use crate::rag::RagConfig;
use crate::{Error, Result};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Dimension of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// Service that computes embeddings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbeddingBackend {
    /// Local Ollama server.
    #[default]
    Ollama,
    /// OpenAI embeddings API.
    #[cfg_attr(feature = "config", value(name = "openai"))]
    OpenAi,
}

/// Configuration for embeddings and the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RigConfig {
    /// Embedding service
    #[cfg_attr(
        feature = "config",
        arg(long, env = "EMBEDDING_PROVIDER", value_enum, default_value_t = EmbeddingBackend::Ollama)
    )]
    pub embedding_provider: EmbeddingBackend,

    /// Ollama base URL for embeddings
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OLLAMA_BASE_URL", default_value = DEFAULT_OLLAMA_BASE_URL)
    )]
    pub ollama_base_url: String,

    /// Embedding model name
    #[cfg_attr(
        feature = "config",
        arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)
    )]
    pub embedding_model: String,

    /// Embedding dimensions (Ollama models only)
    #[cfg_attr(
        feature = "config",
        arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)
    )]
    pub embedding_dimensions: usize,

    /// OpenAI API key
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAI_API_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<String>,

    #[cfg_attr(feature = "config", command(flatten))]
    pub rag: RagConfig,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            embedding_provider: EmbeddingBackend::Ollama,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_owned(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_owned(),
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            openai_api_key: None,
            rag: RagConfig::default(),
        }
    }
}

impl RigConfig {
    /// Resolves the configured embedding model.
    pub fn embedding_model(&self) -> Result<EmbeddingModel> {
        match self.embedding_provider {
            EmbeddingBackend::Ollama => Ok(EmbeddingModel::Ollama(OllamaEmbeddingModel::new(
                &self.embedding_model,
                self.embedding_dimensions,
            ))),
            EmbeddingBackend::OpenAi => OpenAiEmbeddingModel::from_name(&self.embedding_model)
                .map(EmbeddingModel::OpenAi)
                .ok_or_else(|| {
                    Error::config(format!(
                        "unknown OpenAI embedding model '{}'",
                        self.embedding_model
                    ))
                }),
        }
    }

    /// Builds an embedder that connects on first use.
    pub fn lazy_embedder(&self) -> Result<LazyEmbedder> {
        let model = self.embedding_model()?;
        if self.embedding_provider == EmbeddingBackend::OpenAi && self.openai_api_key.is_none() {
            return Err(Error::config("OpenAI embeddings require OPENAI_API_KEY"));
        }

        let name = model.as_str().to_owned();
        let ndims = model.dimensions();
        let base_url = self.ollama_base_url.clone();
        let api_key = self.openai_api_key.clone();

        Ok(LazyEmbedder::new(name, ndims, move || {
            let model = model.clone();
            let base_url = base_url.clone();
            let api_key = api_key.clone();
            async move {
                let provider = EmbeddingProvider::connect(&model, &base_url, api_key.as_deref())?;
                Ok(Arc::new(provider) as Arc<dyn Embedder>)
            }
        }))
    }
}
