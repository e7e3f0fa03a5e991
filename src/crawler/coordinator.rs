//! Run coordinator - drives every configured source through one fetcher
//!
//! This module contains the top-level run logic, including:
//! - Creating the per-run fetcher, adapters and output writer
//! - Running sources one after another, or concurrently when configured
//! - Persisting each source's articles as soon as it finishes
//! - Producing the run summary

use crate::config::Config;
use crate::crawler::ResilientFetcher;
use crate::output::{JsonOutput, RunSummary, SourceReport};
use crate::sources::{build_adapters, SiteAdapter};
use chrono::Utc;
use futures::future::join_all;

/// Runs a complete scrape for the given configuration
///
/// A fresh [`ResilientFetcher`] is created for the run, so crawl policies
/// and request timestamps never carry over from a previous invocation.
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `config_hash` - Hash of the configuration file, stamped into outputs
/// * `only` - Restrict the run to a single source key
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed (individual URLs may have failed)
/// * `Err(CrawlerError)` - Setup failed: unknown source or HTTP client error
pub async fn run(
    config: &Config,
    config_hash: &str,
    only: Option<&str>,
) -> crate::Result<RunSummary> {
    let adapters = build_adapters(config, only)?;
    let fetcher = ResilientFetcher::new(config)?;
    let output = JsonOutput::from_config(&config.output, config_hash);

    tracing::info!(
        sources = adapters.len(),
        parallel = config.crawler.parallel_sources,
        data_lite = config.output.data_lite,
        "Starting run"
    );

    Ok(run_sources(&adapters, &fetcher, &output, config.crawler.parallel_sources).await)
}

/// Runs each adapter and writes its articles
///
/// Sources run in order unless `parallel` is set. Either way the fetcher's
/// per-domain gates apply, so concurrency never breaks politeness.
pub async fn run_sources(
    adapters: &[Box<dyn SiteAdapter>],
    fetcher: &ResilientFetcher,
    output: &JsonOutput,
    parallel: bool,
) -> RunSummary {
    let started_at = Utc::now();

    let sources = if parallel {
        join_all(
            adapters
                .iter()
                .map(|adapter| run_source(adapter.as_ref(), fetcher, output)),
        )
        .await
    } else {
        let mut reports = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            reports.push(run_source(adapter.as_ref(), fetcher, output).await);
        }
        reports
    };

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        sources,
        fetch: fetcher.stats(),
    };
    summary.log();
    summary
}

/// Runs one adapter; failures are logged, never propagated
async fn run_source(
    adapter: &dyn SiteAdapter,
    fetcher: &ResilientFetcher,
    output: &JsonOutput,
) -> SourceReport {
    tracing::info!(source = adapter.key(), name = adapter.name(), "Running source");

    let articles = adapter.fetch_and_extract(fetcher).await;

    let output_path = match output
        .write_source(adapter.key(), adapter.name(), &articles)
        .await
    {
        Ok(Some(path)) => Some(path),
        Ok(None) => {
            tracing::warn!(source = adapter.key(), "No articles extracted, nothing written");
            None
        }
        Err(e) => {
            tracing::error!(source = adapter.key(), error = %e, "Failed to write articles");
            None
        }
    };

    tracing::info!(
        source = adapter.key(),
        articles = articles.len(),
        "Source finished"
    );

    SourceReport {
        key: adapter.key().to_string(),
        name: adapter.name().to_string(),
        articles: articles.len(),
        output_path,
    }
}
