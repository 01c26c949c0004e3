use anyhow::Context;
use clap::Args;
use ragent_rig::RigService;

/// Arguments for `ragent search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Search query
    pub query: String,
}

pub async fn run(service: &RigService, args: SearchArgs) -> anyhow::Result<()> {
    let results = service
        .search_tool()
        .search(&args.query)
        .await
        .context("search failed")?;

    for line in results {
        println!("{line}");
    }
    Ok(())
}
