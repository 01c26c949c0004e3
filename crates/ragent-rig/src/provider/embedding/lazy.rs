//! Initialise-once embedding handle.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use super::Embedder;
use crate::{Error, Result, TRACING_TARGET};

type EmbedderFactory = Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn Embedder>>> + Send + Sync>;

/// Embedder that is constructed on first use and reused afterwards.
///
/// The model name and dimension are known up front so callers can size a
/// collection before the model is ever loaded. The first call to [`get`] (or to
/// any [`Embedder`] method) runs the factory; concurrent first callers wait on
/// the same initialisation. A failed initialisation is not cached.
///
/// [`get`]: LazyEmbedder::get
pub struct LazyEmbedder {
    model_name: String,
    ndims: usize,
    factory: EmbedderFactory,
    cell: OnceCell<Arc<dyn Embedder>>,
}

impl LazyEmbedder {
    /// Creates a lazy embedder around `factory`.
    pub fn new<F, Fut>(model_name: impl Into<String>, ndims: usize, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn Embedder>>> + Send + 'static,
    {
        Self {
            model_name: model_name.into(),
            ndims,
            factory: Box::new(move || Box::pin(factory())),
            cell: OnceCell::new(),
        }
    }

    /// Returns whether the underlying embedder has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the shared embedder, constructing it on the first call.
    pub async fn get(&self) -> Result<Arc<dyn Embedder>> {
        let embedder = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!(
                    target: TRACING_TARGET,
                    model = %self.model_name,
                    "Loading embedding model"
                );

                let embedder = (self.factory)().await?;
                if embedder.ndims() != self.ndims {
                    return Err(Error::config(format!(
                        "embedding model '{}' has {} dimensions, expected {}",
                        embedder.model_name(),
                        embedder.ndims(),
                        self.ndims
                    )));
                }

                Ok(embedder)
            })
            .await?;

        Ok(Arc::clone(embedder))
    }
}

impl std::fmt::Debug for LazyEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyEmbedder")
            .field("model", &self.model_name)
            .field("ndims", &self.ndims)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl Embedder for LazyEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn ndims(&self) -> usize {
        self.ndims
    }

    async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.get().await?.embed_texts(texts).await
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.get().await?.embed_text(text).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::testing::HashEmbedder;

    fn counting(ndims: usize) -> (LazyEmbedder, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let lazy = LazyEmbedder::new("hash", 4, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(HashEmbedder::new(ndims)) as Arc<dyn Embedder>)
            }
        });
        (lazy, loads)
    }

    #[tokio::test]
    async fn returns_identical_handle() {
        let (lazy, loads) = counting(4);
        assert!(!lazy.is_initialized());

        let first = lazy.get().await.unwrap();
        let second = lazy.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(lazy.is_initialized());
    }

    #[tokio::test]
    async fn repeated_embedding_does_not_reload() {
        let (lazy, loads) = counting(4);

        let a = lazy.embed_text("leave policy").await.unwrap();
        let b = lazy.embed_text("leave policy").await.unwrap();
        lazy.embed_texts(vec!["x".into(), "y".into()]).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_use_loads_once() {
        let (lazy, loads) = counting(4);
        let lazy = Arc::new(lazy);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                tokio::spawn(async move { lazy.get().await.map(|_| ()) })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dimension_disagreement_is_rejected() {
        let (lazy, _) = counting(8);
        assert!(matches!(lazy.get().await, Err(Error::Config(_))));
        assert!(!lazy.is_initialized());
    }

    #[tokio::test]
    async fn metadata_is_available_before_loading() {
        let (lazy, loads) = counting(4);
        assert_eq!(lazy.model_name(), "hash");
        assert_eq!(lazy.ndims(), 4);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }
}
