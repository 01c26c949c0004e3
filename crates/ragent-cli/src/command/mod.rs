//! Subcommands.

mod ask;
mod ingest;
mod search;

use std::sync::Arc;

use anyhow::Context;
pub use ask::AskArgs;
use clap::Subcommand;
pub use ingest::IngestArgs;
use ragent_qdrant::QdrantBackend;
use ragent_rig::RigService;
pub use search::SearchArgs;

use crate::config::Cli;

/// What to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Chunk, embed and upload a document into the collection.
    Ingest(IngestArgs),
    /// Print the retrieval results for a query.
    Search(SearchArgs),
    /// Ask the agent a question and print the structured answer.
    Ask(AskArgs),
}

/// Runs the selected subcommand.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let service = connect(&cli)?;

    match cli.command {
        Command::Ingest(args) => ingest::run(&service, args).await,
        Command::Search(args) => search::run(&service, args).await,
        Command::Ask(args) => ask::run(&service, args).await,
    }
}

/// Builds the service shared by every subcommand.
fn connect(cli: &Cli) -> anyhow::Result<RigService> {
    let store = QdrantBackend::connect(&cli.qdrant).context("failed to create Qdrant client")?;
    RigService::from_config(&cli.rig, Arc::new(store)).context("invalid embedding configuration")
}
