//! Facet-Sweep main entry point
//!
//! This is the command-line interface for the Facet-Sweep listing crawler.

use anyhow::Context;
use clap::Parser;
use facet_sweep::config::{load_config_with_hash, Config};
use facet_sweep::crawler::{Coordinator, CrawlMode};
use facet_sweep::output::print_statistics;
use facet_sweep::SweepError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Facet-Sweep: a session-aware marketplace listing crawler
///
/// Negotiates a USD search session with the marketplace, lists the item
/// condition facets, and writes one JSON file per listing to the output
/// directory. Without --set-cond every condition is crawled in turn.
#[derive(Parser, Debug)]
#[command(name = "facet-sweep")]
#[command(version = "1.0.0")]
#[command(about = "Session-aware marketplace listing crawler", long_about = None)]
struct Cli {
    /// Crawl only this condition (display label, case-insensitive)
    #[arg(long, value_name = "CONDITION")]
    set_cond: Option<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory receiving the per-item JSON files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// List the available conditions and exit without crawling
    #[arg(long, conflicts_with = "set_cond")]
    list_conditions: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = cli.output {
        config.output.directory = output;
    }

    let coordinator = Coordinator::new(config).context("failed to prepare output directory")?;

    if cli.list_conditions {
        return handle_list_conditions(&coordinator).await;
    }

    handle_crawl(&coordinator, CrawlMode::from_requested(cli.set_cond)).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("facet_sweep=info,warn"),
            1 => EnvFilter::new("facet_sweep=debug,info"),
            2 => EnvFilter::new("facet_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --list-conditions: discovers the facets and prints them
async fn handle_list_conditions(coordinator: &Coordinator) -> anyhow::Result<()> {
    let facets = coordinator
        .discover()
        .await
        .context("failed to discover conditions")?;

    println!("Available Conditions:");
    for facet in &facets {
        println!("- {}", facet.name);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(coordinator: &Coordinator, mode: CrawlMode) -> anyhow::Result<()> {
    match &mode {
        CrawlMode::Targeted(name) => tracing::info!("Crawling condition '{}'", name),
        CrawlMode::FullSweep => tracing::info!("Crawling every condition"),
    }
    tracing::info!("Writing records to {}", coordinator.sink().directory().display());

    match coordinator.run(&mode).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(SweepError::FacetNotFound {
            requested,
            available,
        }) => {
            println!("Error: Condition '{}' not found.", requested);
            println!("Available Conditions:");
            for name in available {
                println!("- {}", name);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
