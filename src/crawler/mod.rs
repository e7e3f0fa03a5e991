//! Crawler module for polite page fetching
//!
//! This module contains the core fetching logic, including:
//! - Policy-aware HTTP fetching with bounded retries
//! - Per-domain request scheduling and rate limiting
//! - Fetched documents and HTML extraction helpers
//! - Overall run coordination

pub mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run, run_sources};
pub use fetcher::{
    build_http_client, FailureKind, FetchOutcome, FetchStats, FetchStatsSnapshot,
    ResilientFetcher,
};
pub use parser::{
    attr, element_text, first_text, image_source, join_paragraphs, select_all, select_first,
    Document,
};
pub use scheduler::RateLimiter;
