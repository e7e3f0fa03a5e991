use crate::config::types::{Config, CrawlerConfig, OutputConfig, SourceEntry, UserAgentConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.robots_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "robots_timeout_secs must be >= 1, got {}",
            config.robots_timeout_secs
        )));
    }

    // robots.txt lookups must never dominate page latency
    if config.robots_timeout_secs > config.request_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "robots_timeout_secs ({}) must not exceed request_timeout_secs ({})",
            config.robots_timeout_secs, config.request_timeout_secs
        )));
    }

    if config.max_retries < 1 || config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 1 and 10, got {}",
            config.max_retries
        )));
    }

    if !config.crawl_delay_floor_secs.is_finite() || config.crawl_delay_floor_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "crawl_delay_floor_secs must be a non-negative number, got {}",
            config.crawl_delay_floor_secs
        )));
    }

    if config.max_articles_per_source < 1 {
        return Err(ConfigError::Validation(
            "max_articles_per_source must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The name doubles as the robots.txt product token, which only allows these characters
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates source entries
fn validate_sources(sources: &[SourceEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in sources {
        if entry.key.is_empty()
            || !entry
                .key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "Source key '{}' must be non-empty and contain only alphanumeric characters, hyphens and underscores",
                entry.key
            )));
        }

        if !seen.insert(entry.key.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source key '{}'",
                entry.key
            )));
        }

        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Source '{}' must have a name",
                entry.key
            )));
        }

        let url = Url::parse(&entry.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid source URL '{}': {}", entry.url, e))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Validation(format!(
                "Source URL '{}' must use HTTP or HTTPS",
                entry.url
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Source URL '{}' has no host",
                entry.url
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
