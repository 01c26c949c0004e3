//! The tool-calling agent.

use rig::agent::{Agent, AgentBuilder};
use rig::completion::{CompletionModel, Prompt};
use serde_json::json;

use super::answer::{AnswerSchema, StructuredAnswer};
use super::config::AgentConfig;
use super::tool::SearchTool;
use crate::{Result, TRACING_TARGET_AGENT};

/// Question-answering agent over the policy collection.
///
/// Each call to [`ask`](Self::ask) starts a fresh conversation: no memory is
/// carried between questions. The model may search up to `max_turns` times
/// before it has to produce a final reply, which must satisfy
/// [`StructuredAnswer`].
pub struct RagAgent<M: CompletionModel> {
    agent: Agent<M>,
    schema: AnswerSchema,
    config: AgentConfig,
}

impl<M> RagAgent<M>
where
    M: CompletionModel + 'static,
{
    /// Creates an agent that answers with the help of `search`.
    pub fn new(model: M, search: SearchTool, config: AgentConfig) -> Result<Self> {
        let schema = AnswerSchema::new()?;

        let mut builder = AgentBuilder::new(model)
            .name(&config.name)
            .preamble(&config.instructions)
            .additional_params(json!({ "response_format": schema.response_format() }));
        if let Some(temperature) = config.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        let agent = builder.tool(search).build();

        Ok(Self {
            agent,
            schema,
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Answers a question.
    #[tracing::instrument(skip_all, target = TRACING_TARGET_AGENT, fields(agent = %self.config.name, max_turns = self.config.max_turns))]
    pub async fn ask(&self, question: &str) -> Result<StructuredAnswer> {
        let content = self
            .agent
            .prompt(question)
            .multi_turn(self.config.max_turns)
            .await?;

        tracing::debug!(target: TRACING_TARGET_AGENT, reply_len = content.len(), "Model replied");

        let answer = self.schema.parse(&content)?;
        tracing::info!(
            target: TRACING_TARGET_AGENT,
            confidence = answer.confidence,
            refusal = answer.is_refusal(),
            "Answer ready"
        );
        Ok(answer)
    }
}

impl<M: CompletionModel> std::fmt::Debug for RagAgent<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagAgent")
            .field("config", &self.config)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ragent_qdrant::{Distance, MemoryBackend, Point, VectorStore};
    use rig::completion::AssistantContent;
    use rig::message::{Message, ToolResultContent, UserContent};

    use super::*;
    use crate::Error;
    use crate::testing::{HashEmbedder, ScriptedModel};

    async fn search_tool() -> SearchTool {
        let embedder = Arc::new(HashEmbedder::new(8));
        let store = MemoryBackend::new();
        store
            .ensure_collection("policies", 8, Distance::Cosine)
            .await
            .unwrap();
        let points = ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, text)| Point::with_text(i as u64, embedder.vector(text), *text))
            .collect();
        store.upload("policies", points).await.unwrap();
        SearchTool::new(Arc::new(store), embedder, "policies")
    }

    /// Text of the tool result the agent sent back in the latest user message.
    fn last_tool_result(history: &[Message]) -> String {
        let Some(Message::User { content }) = history.last() else {
            panic!("expected a user message");
        };
        let UserContent::ToolResult(result) = content.first() else {
            panic!("expected a tool result");
        };
        let ToolResultContent::Text(text) = result.content.first() else {
            panic!("expected text");
        };
        text.text
    }

    #[tokio::test]
    async fn answers_after_tool_round_trip() {
        let model = ScriptedModel::new([
            ScriptedModel::search_call("call_1", "B"),
            AssistantContent::text(r#"{"answer": "B", "confidence": 0.8}"#),
        ]);
        let agent = RagAgent::new(model.clone(), search_tool().await, AgentConfig::default())
            .unwrap();

        let answer = agent.ask("What is B?").await.unwrap();
        assert_eq!(answer, StructuredAnswer::new("B", 0.8));

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tools[0].name, "search_documents");
        assert_eq!(
            requests[0].preamble.as_deref(),
            Some(AgentConfig::default().instructions.as_str())
        );
        let params = requests[0].additional_params.as_ref().unwrap();
        assert_eq!(params["response_format"]["type"], "json_schema");

        let history: Vec<Message> = requests[1].chat_history.iter().cloned().collect();
        assert!(last_tool_result(&history).contains("Text: B"));
    }

    #[tokio::test]
    async fn answers_without_searching() {
        let model = ScriptedModel::new([AssistantContent::text(
            r#"{"answer": "I am sorry, I could not find the answer.", "confidence": 0.0}"#,
        )]);
        let agent =
            RagAgent::new(model, search_tool().await, AgentConfig::default()).unwrap();

        let answer = agent.ask("Unrelated?").await.unwrap();
        assert!(answer.is_refusal());
    }

    #[tokio::test]
    async fn invalid_confidence_fails() {
        let model = ScriptedModel::new([AssistantContent::text(
            r#"{"answer": "x", "confidence": 2.0}"#,
        )]);
        let agent =
            RagAgent::new(model, search_tool().await, AgentConfig::default()).unwrap();

        assert!(matches!(agent.ask("q").await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_the_model() {
        let model = ScriptedModel::new([
            AssistantContent::tool_call(
                "call_1",
                "lookup_manager",
                serde_json::json!({ "name": "Ann" }),
            ),
            AssistantContent::text(r#"{"answer": "I am sorry, I could not find the answer.", "confidence": 0.0}"#),
        ]);
        let agent = RagAgent::new(model.clone(), search_tool().await, AgentConfig::default())
            .unwrap();

        let answer = agent.ask("Who is Ann's manager?").await.unwrap();
        assert!(answer.is_refusal());

        let requests = model.requests();
        let history: Vec<Message> = requests[1].chat_history.iter().cloned().collect();
        assert!(last_tool_result(&history).contains("lookup_manager"));
    }

    #[tokio::test]
    async fn stops_after_max_turns() {
        let model = ScriptedModel::new(
            ["A", "B", "C", "A", "B"]
                .iter()
                .enumerate()
                .map(|(i, query)| ScriptedModel::search_call(&format!("call_{i}"), query)),
        );
        let config = AgentConfig::default().with_max_turns(1);
        let agent = RagAgent::new(model.clone(), search_tool().await, config).unwrap();

        assert!(matches!(agent.ask("q").await, Err(Error::Agent(_))));
        // The first reply plus one follow-up per allowed turn and a last chance to answer.
        assert_eq!(model.requests().len(), 3);
    }

    #[tokio::test]
    async fn completion_failure_is_a_provider_error() {
        let model = ScriptedModel::new(Vec::<AssistantContent>::new());
        let agent =
            RagAgent::new(model, search_tool().await, AgentConfig::default()).unwrap();

        assert!(matches!(agent.ask("q").await, Err(Error::Provider { .. })));
    }

    #[tokio::test]
    async fn temperature_is_forwarded() {
        let model = ScriptedModel::new([AssistantContent::text(
            r#"{"answer": "x", "confidence": 0.5}"#,
        )]);
        let config = AgentConfig::default().with_temperature(0.0);
        let agent = RagAgent::new(model.clone(), search_tool().await, config).unwrap();

        agent.ask("q").await.unwrap();
        assert_eq!(model.requests()[0].temperature, Some(0.0));
    }
}
