//! Similarity search over the ingested policy chunks.

use std::sync::Arc;

use ragent_qdrant::VectorStore;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};

use super::DEFAULT_SEARCH_LIMIT;
use crate::provider::Embedder;
use crate::{Error, TRACING_TARGET_AGENT};

/// Arguments supplied by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchArgs {
    /// Natural-language search query.
    pub query: String,
}

/// Tool that embeds a query and returns the closest chunks.
///
/// Each result is rendered as `Score: <score>, Text: <text>`, best match first.
#[derive(Clone)]
pub struct SearchTool {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    collection: String,
    limit: usize,
}

impl SearchTool {
    /// Creates a search tool over `collection` returning the top five chunks.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Overrides the number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the searched collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Runs a search and formats the hits.
    pub async fn search(&self, query: &str) -> crate::Result<Vec<String>> {
        tracing::info!(target: TRACING_TARGET_AGENT, query, collection = %self.collection, "Searching documents");

        let vector = self.embedder.embed_text(query).await?;
        let hits = self
            .store
            .query(&self.collection, vector, self.limit)
            .await?;

        Ok(hits
            .iter()
            .map(|hit| {
                let result = format!(
                    "Score: {}, Text: {}",
                    hit.score,
                    hit.text().unwrap_or_default()
                );
                tracing::debug!(target: TRACING_TARGET_AGENT, id = hit.id, "{result}");
                result
            })
            .collect())
    }
}

impl std::fmt::Debug for SearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTool")
            .field("collection", &self.collection)
            .field("limit", &self.limit)
            .field("store", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

impl Tool for SearchTool {
    type Args = SearchArgs;
    type Error = Error;
    type Output = Vec<String>;

    const NAME: &'static str = "search_documents";

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_owned(),
            description: "Search the HR policy documents for passages relevant to a query. \
                          Returns the most similar passages with their similarity scores."
                .to_owned(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look for in the policy documents"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    #[tracing::instrument(skip_all, target = TRACING_TARGET_AGENT, fields(tool = Self::NAME, query_len = args.query.len()))]
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let results = self.search(&args.query).await?;
        tracing::debug!(target: TRACING_TARGET_AGENT, result_count = results.len(), "search_documents completed");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use ragent_qdrant::{Distance, MemoryBackend, Point};

    use super::*;
    use crate::testing::HashEmbedder;

    async fn seeded(texts: &[&str]) -> SearchTool {
        let embedder = Arc::new(HashEmbedder::new(8));
        let store = MemoryBackend::new();
        store
            .ensure_collection("policies", 8, Distance::Cosine)
            .await
            .unwrap();

        let points = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Point::with_text(i as u64, embedder.vector(text), *text))
            .collect();
        store.upload("policies", points).await.unwrap();

        SearchTool::new(Arc::new(store), embedder, "policies")
    }

    #[tokio::test]
    async fn best_match_comes_first() {
        let tool = seeded(&["A", "B", "C"]).await;

        let results = tool.call(SearchArgs { query: "B".into() }).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].starts_with("Score: "));
        assert!(results[0].ends_with(", Text: B"));
    }

    #[tokio::test]
    async fn returns_at_most_five() {
        let texts = ["A", "B", "C", "D", "E", "F", "G"];
        let tool = seeded(&texts).await;

        let results = tool.search("A").await.unwrap();
        assert_eq!(results.len(), 5);
    }

    #[tokio::test]
    async fn missing_collection_is_an_error() {
        let tool = SearchTool::new(
            Arc::new(MemoryBackend::new()),
            Arc::new(HashEmbedder::new(8)),
            "nowhere",
        );
        assert!(matches!(tool.search("A").await, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn definition_requires_query() {
        let tool = seeded(&["A"]).await;
        let definition = tool.definition(String::new()).await;
        assert_eq!(definition.name, "search_documents");
        assert_eq!(definition.parameters["required"][0], "query");
    }
}
