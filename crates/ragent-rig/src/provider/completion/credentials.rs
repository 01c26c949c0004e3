//! Azure OpenAI credential resolution.

use std::io;

use rig::providers::azure::AzureOpenAIAuth;
use serde::Deserialize;
use tokio::process::Command;

use crate::{Error, Result, TRACING_TARGET_AGENT};

/// Token audience for Azure OpenAI.
pub const COGNITIVE_SERVICES_RESOURCE: &str = "https://cognitiveservices.azure.com";

/// Azure CLI executable looked up on `PATH` by default.
pub const DEFAULT_AZURE_CLI: &str = "az";

/// Fetches an Entra ID token from the account signed in to the Azure CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureCliCredential {
    program: String,
    resource: String,
}

impl Default for AzureCliCredential {
    fn default() -> Self {
        Self::new(DEFAULT_AZURE_CLI)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliAccessToken {
    access_token: String,
}

impl AzureCliCredential {
    /// Creates a credential that runs `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            resource: COGNITIVE_SERVICES_RESOURCE.to_owned(),
        }
    }

    /// Runs `az account get-access-token` and returns the bearer token.
    pub async fn access_token(&self) -> Result<String> {
        tracing::debug!(
            target: TRACING_TARGET_AGENT,
            program = %self.program,
            resource = %self.resource,
            "Requesting token from Azure CLI"
        );

        let output = Command::new(&self.program)
            .args(["account", "get-access-token", "--output", "json", "--resource"])
            .arg(&self.resource)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::config(format!(
                    "no Azure credentials: set AZURE_OPENAI_API_KEY or AZURE_OPENAI_AD_TOKEN, \
                     or install the Azure CLI ('{}' was not found)",
                    self.program
                )),
                _ => Error::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::config(format!(
                "Azure CLI token request failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_access_token(&output.stdout)
    }
}

fn parse_access_token(stdout: &[u8]) -> Result<String> {
    let token: CliAccessToken = serde_json::from_slice(stdout)
        .map_err(|e| Error::config(format!("unexpected Azure CLI output: {e}")))?;

    if token.access_token.is_empty() {
        return Err(Error::config("Azure CLI returned an empty access token"));
    }
    Ok(token.access_token)
}

/// Picks how to authenticate: API key, then Entra ID token, then the Azure CLI.
pub async fn resolve_auth(
    api_key: Option<&str>,
    ad_token: Option<&str>,
    cli: &AzureCliCredential,
) -> Result<AzureOpenAIAuth> {
    let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_owned);

    if let Some(key) = non_empty(api_key) {
        return Ok(AzureOpenAIAuth::ApiKey(key));
    }
    if let Some(token) = non_empty(ad_token) {
        return Ok(AzureOpenAIAuth::Token(token));
    }

    cli.access_token().await.map(AzureOpenAIAuth::Token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_cli() -> AzureCliCredential {
        AzureCliCredential::new("ragent-azure-cli-that-does-not-exist")
    }

    #[tokio::test]
    async fn api_key_takes_precedence_over_token() {
        let auth = resolve_auth(Some("key"), Some("token"), &missing_cli())
            .await
            .unwrap();
        assert!(matches!(auth, AzureOpenAIAuth::ApiKey(k) if k == "key"));

        let auth = resolve_auth(Some(""), Some("token"), &missing_cli())
            .await
            .unwrap();
        assert!(matches!(auth, AzureOpenAIAuth::Token(t) if t == "token"));
    }

    #[tokio::test]
    async fn missing_cli_is_a_config_error() {
        let result = resolve_auth(None, None, &missing_cli()).await;
        assert!(matches!(result, Err(Error::Config(_))));

        let result = missing_cli().access_token().await;
        assert!(matches!(result, Err(Error::Config(message)) if message.contains("AZURE_OPENAI_API_KEY")));
    }

    #[test]
    fn parses_cli_token_output() {
        let stdout = br#"{
            "accessToken": "eyJ0eXAi",
            "expiresOn": "2026-10-19 12:00:00.000000",
            "subscription": "00000000-0000-0000-0000-000000000000",
            "tokenType": "Bearer"
        }"#;
        assert_eq!(parse_access_token(stdout).unwrap(), "eyJ0eXAi");
    }

    #[test]
    fn rejects_empty_or_malformed_cli_output() {
        assert!(matches!(
            parse_access_token(br#"{"accessToken": ""}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_access_token(b"ERROR: Please run 'az login'"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn default_targets_cognitive_services() {
        let cli = AzureCliCredential::default();
        assert_eq!(cli.program, "az");
        assert_eq!(cli.resource, COGNITIVE_SERVICES_RESOURCE);
    }
}
