//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── log_format: LogFormat       # text or json
//! ├── qdrant: QdrantConfig        # vector store connection
//! ├── rig: RigConfig              # embeddings, collection, chunking
//! └── command: Command            # ingest | search | ask
//! ```
//!
//! Every option can be given as a flag or through its environment variable.

use std::process;

use clap::{Parser, ValueEnum};
use ragent_qdrant::QdrantConfig;
use ragent_rig::RigConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "ragent")]
#[command(about = "Agentic retrieval over HR policy documents")]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Vector store connection.
    #[clap(flatten)]
    pub qdrant: QdrantConfig,

    /// Embedding model and retrieval settings.
    #[clap(flatten)]
    pub rig: RigConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read first so that clap's `env` fallbacks see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that command output on stdout stays machine-readable.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.log_format {
            LogFormat::Text => registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init(),
        }
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            qdrant_url = %self.qdrant.url,
            qdrant_api_key = self.qdrant.api_key.is_some(),
            collection = %self.rig.rag.collection,
            embedding_provider = %self.rig.embedding_provider,
            embedding_model = %self.rig.embedding_model,
            chunk_size = self.rig.rag.chunk_size,
            chunk_overlap = self.rig.rag.chunk_overlap,
            search_limit = self.rig.rag.search_limit,
            "Configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ingest_defaults_to_policy_pdf() {
        let cli = Cli::try_parse_from(["ragent", "ingest"]).unwrap();
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.path.to_str(), Some("data/hr_policies.pdf"));
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["ragent", "search"]).is_err());
        let cli = Cli::try_parse_from(["ragent", "search", "leave"]).unwrap();
        assert!(matches!(cli.command, Command::Search(ref args) if args.query == "leave"));
    }

    #[test]
    fn log_format_accepts_json() {
        let cli = Cli::try_parse_from(["ragent", "ingest", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
