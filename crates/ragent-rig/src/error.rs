//! Error types for ragent-rig.

use std::fmt;

use rig::completion::PromptError;

/// Result type alias for rig operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during ingestion or question answering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Provider error (API call failed, unexpected status, etc.)
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Agent execution error.
    #[error("agent error: {0}")]
    Agent(String),

    /// Tool execution error.
    #[error("tool error: {tool}: {message}")]
    Tool { tool: String, message: String },

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Document loading error.
    #[error("document error: {0}")]
    Document(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Model output could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Model output did not satisfy the answer contract.
    #[error("validation error: {0}")]
    Validation(String),

    /// Vector store error.
    #[error(transparent)]
    Store(#[from] ragent_qdrant::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error, e.g. failing to run the Azure CLI.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PromptError> for Error {
    fn from(error: PromptError) -> Self {
        match error {
            PromptError::CompletionError(e) => Self::provider("completion", e),
            PromptError::MaxDepthError { max_depth, .. } => Self::agent(format!(
                "no final answer after {max_depth} tool-calling turns"
            )),
            PromptError::ToolError(e) => Self::tool("agent", e),
            PromptError::ToolServerError(e) => Self::tool("agent", e),
            other => Self::agent(other),
        }
    }
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an agent error.
    pub fn agent(message: impl fmt::Display) -> Self {
        Self::Agent(message.to_string())
    }

    /// Creates a tool error.
    pub fn tool(tool: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Tool {
            tool: tool.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an embedding error.
    pub fn embedding(message: impl fmt::Display) -> Self {
        Self::Embedding(message.to_string())
    }

    /// Creates a document error.
    pub fn document(message: impl fmt::Display) -> Self {
        Self::Document(message.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Creates a parse error.
    pub fn parse(message: impl fmt::Display) -> Self {
        Self::Parse(message.to_string())
    }

    /// Creates a validation error.
    pub fn validation(message: impl fmt::Display) -> Self {
        Self::Validation(message.to_string())
    }
}
