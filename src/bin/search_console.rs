//! Interactive search console binary.

use anyhow::Context;
use bytemonk_search::run_console;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use typesense_search::{Orchestrator, SearchConfig, SearchStrategy, TypesenseClient};

/// Typo-tolerant book search over a Typesense index.
#[derive(Parser)]
#[command(name = "search-console", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keyword-only ranking, even if hybrid search is configured.
    #[arg(long)]
    lexical: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout is reserved for the rendered view; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("typesense_search=info,bytemonk_search=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => SearchConfig::from_file(path)?,
        None => match SearchConfig::default_config_path() {
            Some(path) if path.exists() => SearchConfig::from_file(&path)?,
            _ => SearchConfig::default(),
        },
    };
    config.apply_env_overrides();
    if cli.lexical {
        config.search.strategy = SearchStrategy::Lexical;
    }

    let client = TypesenseClient::new(&config.connection)
        .context("failed to create Typesense client")?;
    let orchestrator = Orchestrator::new(client, config)?;
    tracing::info!(?orchestrator, "search console ready");

    println!("search-console v{} (/help for commands)", env!("CARGO_PKG_VERSION"));
    let stdin = BufReader::new(tokio::io::stdin());
    run_console(&orchestrator, stdin, tokio::io::stdout()).await
}
