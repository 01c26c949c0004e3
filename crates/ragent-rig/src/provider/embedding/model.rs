//! Type-safe embedding model references.

use serde::{Deserialize, Serialize};

/// Reference to an embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// Ollama local models.
    Ollama(OllamaEmbeddingModel),
    /// OpenAI embedding models.
    OpenAi(OpenAiEmbeddingModel),
}

impl EmbeddingModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ollama(m) => &m.name,
            Self::OpenAi(m) => m.as_str(),
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::Ollama(m) => m.dimensions,
            Self::OpenAi(m) => m.dimensions(),
        }
    }
}

/// OpenAI embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenAiEmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
    /// text-embedding-ada-002 (legacy, 1536 dimensions)
    TextEmbeddingAda002,
}

impl OpenAiEmbeddingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding3Small => "text-embedding-3-small",
            Self::TextEmbedding3Large => "text-embedding-3-large",
            Self::TextEmbeddingAda002 => "text-embedding-ada-002",
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Small | Self::TextEmbeddingAda002 => 1536,
            Self::TextEmbedding3Large => 3072,
        }
    }

    /// Looks a model up by its API name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::TextEmbedding3Small,
            Self::TextEmbedding3Large,
            Self::TextEmbeddingAda002,
        ]
        .into_iter()
        .find(|m| m.as_str() == name)
    }
}

/// Ollama embedding model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaEmbeddingModel {
    /// Model name (e.g., "nomic-embed-text", "mxbai-embed-large").
    pub name: String,
    /// Embedding dimensions.
    pub dimensions: usize,
}

impl OllamaEmbeddingModel {
    pub fn new(name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: name.into(),
            dimensions,
        }
    }

    pub fn nomic_embed_text() -> Self {
        Self::new("nomic-embed-text", 768)
    }
}

impl Default for EmbeddingModel {
    fn default() -> Self {
        Self::Ollama(OllamaEmbeddingModel::nomic_embed_text())
    }
}
