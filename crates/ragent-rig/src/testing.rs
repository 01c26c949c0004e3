//! Deterministic fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rig::completion::{
    AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    GetTokenUsage, Usage,
};
use rig::one_or_many::OneOrMany;
use rig::streaming::StreamingCompletionResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Result;
use crate::provider::Embedder;

/// Embeds text by counting bytes into `ndims` buckets.
///
/// Texts made of different single letters land in orthogonal buckets when
/// `ndims` is at least the alphabet distance between them.
pub(crate) struct HashEmbedder {
    ndims: usize,
}

impl HashEmbedder {
    pub(crate) fn new(ndims: usize) -> Self {
        Self { ndims }
    }

    pub(crate) fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.ndims];
        for byte in text.bytes() {
            vector[byte as usize % self.ndims] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "hash"
    }

    fn ndims(&self) -> usize {
        self.ndims
    }

    async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

/// Chat model that replays canned replies and records every request.
///
/// Clones share the script, so a test can keep one handle for inspection
/// after moving another into the agent.
#[derive(Clone, Default)]
pub(crate) struct ScriptedModel {
    replies: Arc<Mutex<VecDeque<AssistantContent>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedModel {
    pub(crate) fn new(replies: impl IntoIterator<Item = AssistantContent>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    /// A reply calling `search_documents` with `query`.
    pub(crate) fn search_call(id: &str, query: &str) -> AssistantContent {
        AssistantContent::tool_call(id, "search_documents", json!({ "query": query }))
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Raw response of [`ScriptedModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ScriptedResponse;

impl GetTokenUsage for ScriptedResponse {
    fn token_usage(&self) -> Option<Usage> {
        None
    }
}

impl CompletionModel for ScriptedModel {
    type Client = ();
    type Response = ScriptedResponse;
    type StreamingResponse = ScriptedResponse;

    fn make(_client: &Self::Client, _model: impl Into<String>) -> Self {
        Self::default()
    }

    async fn completion(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse<Self::Response>, CompletionError> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CompletionError::ProviderError("no reply left".to_owned()))?;

        Ok(CompletionResponse {
            choice: OneOrMany::one(reply),
            usage: Usage::new(),
            raw_response: ScriptedResponse,
        })
    }

    async fn stream(
        &self,
        _request: CompletionRequest,
    ) -> std::result::Result<StreamingCompletionResponse<Self::StreamingResponse>, CompletionError>
    {
        Err(CompletionError::ProviderError(
            "streaming is not scripted".to_owned(),
        ))
    }
}
