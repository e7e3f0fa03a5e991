//! Espectro Crawler: a polite news-article fetcher
//!
//! This crate fetches article listings and detail pages from a fixed set of
//! news sites while respecting robots.txt, per-domain crawl delays, and a
//! bounded retry budget for every request.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sources;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Espectro operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingDomain,
}

/// Result type alias for Espectro operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Document, FetchOutcome, ResilientFetcher};
pub use robots::CrawlPolicy;
pub use sources::{Article, SiteAdapter};
pub use url::Domain;
