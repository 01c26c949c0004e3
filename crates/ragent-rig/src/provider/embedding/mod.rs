//! Embedding models and providers.

mod lazy;
mod model;
mod provider;

use async_trait::async_trait;
pub use lazy::LazyEmbedder;
pub use model::{EmbeddingModel, OllamaEmbeddingModel, OpenAiEmbeddingModel};
pub use provider::EmbeddingProvider;

use crate::{Error, Result};

/// Maps text to fixed-length vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model name.
    fn model_name(&self) -> &str;

    /// Returns the vector dimension.
    fn ndims(&self) -> usize;

    /// Embeds a batch of texts, preserving input order.
    async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Embeds a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_texts(vec![text.to_owned()])
            .await?
            .pop()
            .ok_or_else(|| Error::embedding("provider returned no embedding"))
    }
}
