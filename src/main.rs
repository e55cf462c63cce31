//! trendyol-scout - scrape, index, and search Trendyol gaming mice.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use trendyol_scout::commands::{IngestCommand, QueryCommand};
use trendyol_scout::config::Config;
use trendyol_scout::search::SearchIndex;
use trendyol_scout::web;

#[derive(Parser)]
#[command(
    name = "trendyol-scout",
    version,
    about = "Scrape Trendyol gaming-mice listings into a local search index",
    long_about = "Scrapes one Trendyol category listing plus per-product detail pages, \
loads the products into an embedded full-text index, and serves keyword search \
with price-range facets over a web UI."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "TRENDYOL_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "TRENDYOL_DELAY")]
    delay: Option<u64>,

    /// Search index directory
    #[arg(long, global = true, env = "TRENDYOL_INDEX_DIR")]
    index_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest on first run, then serve the web UI (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "TRENDYOL_PORT")]
        port: Option<u16>,
    },

    /// Scrape now and replace the whole index
    Reindex,

    /// Print index generation and document count
    Status,

    /// Run a one-shot search against the local index
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(index_dir) = cli.index_dir {
        config.index_dir = index_dir;
    }

    let index = SearchIndex::open_or_create(
        &config.index_dir,
        config.price_buckets.clone(),
        config.max_hits,
    )
    .context("Failed to open search index")?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }

            let report = IngestCommand::new(config.clone()).ingest_if_new(&index).await?;
            if report.skipped {
                println!(
                    "Index already populated (generation {}), serving existing data",
                    report.generation
                );
            } else {
                println!("Ingested {} products (generation {})", report.indexed, report.generation);
            }

            web::serve(Arc::new(index), config.port).await?;
        }

        Commands::Reindex => {
            let report = IngestCommand::new(config).reindex(&index).await?;
            println!("Reindexed {} products (generation {})", report.indexed, report.generation);
        }

        Commands::Status => {
            println!("generation: {}", index.generation()?);
            println!("documents:  {}", index.num_docs());
        }

        Commands::Search { query } => {
            let output = QueryCommand::execute(&index, &query)?;
            println!("{}", output);
        }
    }

    Ok(())
}
