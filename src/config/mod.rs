//! Configuration module for Espectro
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Configuration is read once at startup; nothing in it changes during a run.
//!
//! # Example
//!
//! ```no_run
//! use espectro_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("espectro.toml")).unwrap();
//! println!("Max retries: {}", config.crawler.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AdapterKind, Config, CrawlerConfig, OutputConfig, SourceEntry, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
