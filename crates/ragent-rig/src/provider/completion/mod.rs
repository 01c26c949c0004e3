//! Chat-completion providers.
//!
//! The agent runs on any rig [`CompletionModel`](rig::completion::CompletionModel);
//! this module builds the Azure OpenAI one from configuration.

mod azure;
mod credentials;

pub use azure::{AzureCompletionModel, AzureConfig, DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS};
pub use credentials::{
    AzureCliCredential, COGNITIVE_SERVICES_RESOURCE, DEFAULT_AZURE_CLI, resolve_auth,
};
