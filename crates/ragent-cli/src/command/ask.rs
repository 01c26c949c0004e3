use anyhow::Context;
use clap::Args;
use ragent_rig::RigService;
use ragent_rig::agent::AgentConfig;
use ragent_rig::provider::AzureConfig;

use crate::TRACING_TARGET_COMMAND;

/// Question asked when none is given.
pub const DEFAULT_QUESTION: &str = "What is the pre employment health check up policy?";

/// Arguments for `ragent ask`.
#[derive(Debug, Clone, Args)]
pub struct AskArgs {
    /// Question about the ingested documents
    #[arg(default_value = DEFAULT_QUESTION)]
    pub question: String,

    /// Azure OpenAI deployment.
    #[clap(flatten)]
    pub azure: AzureConfig,

    /// Agent loop settings.
    #[clap(flatten)]
    pub agent: AgentConfig,
}

pub async fn run(service: &RigService, args: AskArgs) -> anyhow::Result<()> {
    let model = args
        .azure
        .completion_model()
        .await
        .context("invalid Azure OpenAI configuration")?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        deployment = %args.azure.deployment,
        max_turns = args.agent.max_turns,
        "Asking agent"
    );

    let agent = service
        .agent(model, args.agent)
        .context("failed to build agent")?;
    let answer = agent
        .ask(&args.question)
        .await
        .context("agent failed to answer")?;

    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}
