//! Model providers.

pub mod completion;
pub mod embedding;

pub use completion::{AzureCliCredential, AzureCompletionModel, AzureConfig};
pub use embedding::{
    Embedder, EmbeddingModel, EmbeddingProvider, LazyEmbedder, OllamaEmbeddingModel,
    OpenAiEmbeddingModel,
};
