//! Run statistics
//!
//! This module collects what one run produced per source together with the
//! fetcher's counters, and renders it for the terminal and the log.

use crate::crawler::FetchStatsSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Result of running one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    /// Source key from the configuration
    pub key: String,

    /// Outlet name
    pub name: String,

    /// Number of articles extracted
    pub articles: usize,

    /// File the articles were written to, if any
    pub output_path: Option<PathBuf>,
}

/// Summary of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Per-source results, in configuration order
    pub sources: Vec<SourceReport>,

    /// Fetcher counters at the end of the run
    pub fetch: FetchStatsSnapshot,
}

impl RunSummary {
    /// Total articles across all sources
    pub fn total_articles(&self) -> usize {
        self.sources.iter().map(|s| s.articles).sum()
    }

    /// Sources that produced no articles
    pub fn empty_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.articles == 0)
            .map(|s| s.key.as_str())
            .collect()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Emits the summary as one structured log line
    pub fn log(&self) {
        tracing::info!(
            sources = self.sources.len(),
            articles = self.total_articles(),
            fetched = self.fetch.fetched,
            denied = self.fetch.denied,
            exhausted = self.fetch.exhausted,
            attempts = self.fetch.attempts,
            duration_secs = self.duration_seconds(),
            "Run complete"
        );
    }
}

/// Prints the summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The run summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Run Summary ===\n");

    println!("Sources:");
    for source in &summary.sources {
        match &source.output_path {
            Some(path) => println!(
                "  {} ({}): {} articles -> {}",
                source.key,
                source.name,
                source.articles,
                path.display()
            ),
            None => println!(
                "  {} ({}): {} articles",
                source.key, source.name, source.articles
            ),
        }
    }
    println!();

    println!("Requests:");
    println!("  Pages fetched: {}", summary.fetch.fetched);
    println!("  Blocked by robots.txt: {}", summary.fetch.denied);
    println!("  Failed after retries: {}", summary.fetch.exhausted);
    println!("  HTTP attempts: {}", summary.fetch.attempts);
    println!();

    println!(
        "Total: {} articles in {}s",
        summary.total_articles(),
        summary.duration_seconds()
    );
}
