//! Shared fixtures for the integration tests

use espectro_crawler::config::{
    AdapterKind, Config, CrawlerConfig, OutputConfig, SourceEntry, UserAgentConfig,
};

pub const AGENT: &str = "TestBot";

/// Creates a test configuration with no sources
pub fn test_config(floor_secs: f64, max_retries: u32, output_dir: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_timeout_secs: 5,
            robots_timeout_secs: 2,
            max_retries,
            crawl_delay_floor_secs: floor_secs,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: AGENT.to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            directory: output_dir.to_string(),
            data_lite: true,
        },
        sources: vec![],
    }
}

pub fn source(key: &str, url: &str, adapter: AdapterKind) -> SourceEntry {
    SourceEntry {
        key: key.to_string(),
        name: key.to_uppercase(),
        url: url.to_string(),
        adapter,
    }
}
