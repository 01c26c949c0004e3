use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ragent_rig::RigService;

use crate::TRACING_TARGET_COMMAND;

/// Default document to ingest.
pub const DEFAULT_DOCUMENT: &str = "data/hr_policies.pdf";

/// Arguments for `ragent ingest`.
#[derive(Debug, Clone, Args)]
pub struct IngestArgs {
    /// Document to ingest (PDF, text or markdown)
    #[arg(default_value = DEFAULT_DOCUMENT)]
    pub path: PathBuf,
}

pub async fn run(service: &RigService, args: IngestArgs) -> anyhow::Result<()> {
    let indexer = service.indexer().context("invalid chunking configuration")?;

    let report = indexer
        .ingest(&args.path)
        .await
        .with_context(|| format!("failed to ingest {}", args.path.display()))?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        collection = %report.collection,
        chunks = report.chunks,
        dimensions = report.dimensions,
        "Ingestion finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
