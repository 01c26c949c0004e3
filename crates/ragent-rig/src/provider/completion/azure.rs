//! Azure OpenAI chat deployment.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use rig::providers::azure;
use serde::{Deserialize, Serialize};
use url::Url;

use super::credentials::{AzureCliCredential, DEFAULT_AZURE_CLI, resolve_auth};
use crate::{Error, Result, TRACING_TARGET_AGENT};

/// Azure OpenAI REST API version used by default.
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Default timeout for chat requests: 60 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const PROVIDER: &str = "azure_openai";

/// Chat model served by an Azure OpenAI deployment.
pub type AzureCompletionModel = azure::CompletionModel<reqwest::Client>;

/// Connection settings for an Azure OpenAI deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AzureConfig {
    /// Azure OpenAI resource endpoint, e.g. https://my-resource.openai.azure.com
    #[cfg_attr(feature = "config", arg(long = "azure-endpoint", env = "AZURE_OPENAI_ENDPOINT"))]
    pub endpoint: String,

    /// Chat model deployment name
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-deployment", env = "AZURE_AI_MODEL_DEPLOYMENT_NAME")
    )]
    pub deployment: String,

    /// REST API version
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-api-version", env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_API_VERSION)
    )]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// API key (sent as the `api-key` header)
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-api-key", env = "AZURE_OPENAI_API_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Microsoft Entra ID access token, used when no API key is set
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-ad-token", env = "AZURE_OPENAI_AD_TOKEN", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub ad_token: Option<String>,

    /// Azure CLI used to fetch a token when neither key nor token is set
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-cli", env = "AZURE_CLI_PATH", default_value = DEFAULT_AZURE_CLI)
    )]
    #[serde(default = "default_azure_cli")]
    pub azure_cli: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_azure_cli() -> String {
    DEFAULT_AZURE_CLI.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AzureConfig {
    /// Creates a configuration without explicit credentials.
    pub fn new(endpoint: impl Into<String>, deployment: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: default_api_version(),
            api_key: None,
            ad_token: None,
            azure_cli: default_azure_cli(),
            http_timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the Entra ID access token.
    #[must_use]
    pub fn with_ad_token(mut self, token: impl Into<String>) -> Self {
        self.ad_token = Some(token.into());
        self
    }

    /// Sets the Azure CLI executable used as the last credential source.
    #[must_use]
    pub fn with_azure_cli(mut self, program: impl Into<String>) -> Self {
        self.azure_cli = program.into();
        self
    }

    /// Returns the timeout, using the default if zero.
    pub fn timeout(&self) -> Duration {
        match self.http_timeout {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Returns the endpoint without a trailing slash, checking that it is a URL.
    pub fn base_endpoint(&self) -> Result<String> {
        let endpoint = self.endpoint.trim_end_matches('/');
        let url = Url::parse(endpoint)
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }

        if self.deployment.is_empty() {
            return Err(Error::config("deployment name cannot be empty"));
        }

        Ok(endpoint.to_owned())
    }

    /// Resolves credentials and builds the rig client.
    pub async fn client(&self) -> Result<azure::Client> {
        let endpoint = self.base_endpoint()?;
        let cli = AzureCliCredential::new(&self.azure_cli);
        let auth = resolve_auth(self.api_key.as_deref(), self.ad_token.as_deref(), &cli).await?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(concat!("ragent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET_AGENT,
            endpoint = %endpoint,
            deployment = %self.deployment,
            api_version = %self.api_version,
            auth = ?auth,
            "Created Azure OpenAI client"
        );

        azure::Client::<reqwest::Client>::builder()
            .http_client(http)
            .api_key(auth)
            .azure_endpoint(endpoint)
            .api_version(&self.api_version)
            .build()
            .map_err(|e| Error::provider(PROVIDER, e))
    }

    /// Builds the chat model for the configured deployment.
    pub async fn completion_model(&self) -> Result<AzureCompletionModel> {
        let client = self.client().await?;
        Ok(azure::CompletionModel::new(client, &self.deployment))
    }
}
