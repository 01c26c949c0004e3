//! Agent configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Fixed reply for questions the retrieved context does not answer.
pub const REFUSAL: &str = "I am sorry, I could not find the answer.";

/// Default agent name.
pub const DEFAULT_AGENT_NAME: &str = "AgenticRagAgent";

/// Default number of tool-calling turns allowed per question.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// System instructions for the HR policy agent.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are a helpful assistant that answers questions about the company's HR policies.
Always call the search_documents tool to retrieve relevant policy text before answering.
Answer only from the retrieved context. Do not use prior knowledge.
If the context does not contain the answer, reply with exactly: I am sorry, I could not find the answer.
Respond with a JSON object with two fields: \"answer\" (string) and \"confidence\" (number between 0 and 1).";

/// Configuration for [`RagAgent`](super::RagAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AgentConfig {
    /// Agent name used in logs
    #[cfg_attr(feature = "config", arg(skip = DEFAULT_AGENT_NAME.to_owned()))]
    pub name: String,

    /// System instructions
    #[cfg_attr(feature = "config", arg(skip = DEFAULT_INSTRUCTIONS.to_owned()))]
    pub instructions: String,

    /// Tool-calling turns allowed before the model must answer
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AGENT_MAX_TURNS", default_value_t = DEFAULT_MAX_TURNS)
    )]
    pub max_turns: usize,

    /// Sampling temperature (service default when unset)
    #[cfg_attr(feature = "config", arg(long, env = "AGENT_TEMPERATURE"))]
    pub temperature: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_owned(),
            instructions: DEFAULT_INSTRUCTIONS.to_owned(),
            max_turns: DEFAULT_MAX_TURNS,
            temperature: None,
        }
    }
}

impl AgentConfig {
    /// Replaces the system instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Sets the tool-calling turn bound.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_mention_refusal() {
        let config = AgentConfig::default();
        assert!(config.instructions.contains(REFUSAL));
        assert_eq!(config.max_turns, 10);
        assert_eq!(config.name, "AgenticRagAgent");
    }
}
