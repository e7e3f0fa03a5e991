//! Espectro crawler main entry point
//!
//! This is the command-line interface for the Espectro news crawler.

use anyhow::Context;
use clap::Parser;
use espectro_crawler::config::{load_config_with_hash, Config};
use espectro_crawler::crawler;
use espectro_crawler::output::print_summary;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Espectro: a polite news crawler
///
/// Scrapes the homepages of the configured Brazilian news outlets while
/// respecting robots.txt, per-domain crawl delays and a bounded retry
/// budget, and writes one JSON file of articles per source.
#[derive(Parser, Debug)]
#[command(name = "espectro-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite news crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Run a single source by key (e.g. g1, folha, estadao)
    #[arg(short, long, value_name = "KEY")]
    source: Option<String>,

    /// Force data-lite mode (drop image URLs)
    #[arg(long)]
    lite: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Also append log records to this file (e.g. logs/espectro.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.lite {
        config.output.data_lite = true;
    }

    if let Some(key) = cli.source.as_deref() {
        if config.source(key).is_none() {
            anyhow::bail!(
                "Unknown source '{}'. Available sources: {}",
                key,
                config.source_keys().join(", ")
            );
        }
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.source.as_deref());
        return Ok(());
    }

    let summary = crawler::run(&config, &config_hash, cli.source.as_deref())
        .await
        .context("Run setup failed")?;

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, takes precedence over the flags. With a log file,
/// the same records are appended there without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "espectro_crawler=info,warn",
            1 => "espectro_crawler=debug,info",
            2 => "espectro_crawler=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Opens `path` for appending, creating missing parent directories
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, only: Option<&str>) {
    println!("=== Espectro Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Robots.txt timeout: {}s", config.crawler.robots_timeout_secs);
    println!("  Max attempts per URL: {}", config.crawler.max_retries);
    println!(
        "  Crawl delay floor: {}s",
        config.crawler.crawl_delay_floor_secs
    );
    println!(
        "  Max articles per source: {}",
        config.crawler.max_articles_per_source
    );
    println!("  Fetch article pages: {}", config.crawler.fetch_details);
    println!("  Parallel sources: {}", config.crawler.parallel_sources);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());
    println!("  Robots.txt token: {}", config.user_agent.product_token());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  Data-lite mode: {}",
        if config.output.data_lite { "ON" } else { "OFF" }
    );

    let selected: Vec<_> = config
        .sources
        .iter()
        .filter(|s| only.map_or(true, |key| s.key.eq_ignore_ascii_case(key)))
        .collect();

    println!("\nSources ({}):", selected.len());
    for source in &selected {
        println!(
            "  - {} ({}) {} [{:?}]",
            source.key, source.name, source.url, source.adapter
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} source(s)", selected.len());
}
