use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Espectro
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
}

impl Config {
    /// Looks up a configured source by its key (case-insensitive)
    pub fn source(&self, key: &str) -> Option<&SourceEntry> {
        self.sources
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(key))
    }

    /// Returns the keys of all configured sources
    pub fn source_keys(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.key.as_str()).collect()
    }
}

/// Fetch behavior configuration
///
/// Every field has a default, so the whole `[crawler]` table may be omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Timeout for article and listing requests (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for robots.txt requests (seconds)
    #[serde(rename = "robots-timeout-secs")]
    pub robots_timeout_secs: u64,

    /// Total number of attempts per URL
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Minimum time between requests to the same domain (seconds)
    #[serde(rename = "crawl-delay-floor-secs")]
    pub crawl_delay_floor_secs: f64,

    /// Whether to fetch each article's detail page after the listing
    #[serde(rename = "fetch-details")]
    pub fetch_details: bool,

    /// Run sources concurrently instead of one after another
    #[serde(rename = "parallel-sources")]
    pub parallel_sources: bool,

    /// Maximum number of listing entries taken from a homepage
    #[serde(rename = "max-articles-per-source")]
    pub max_articles_per_source: usize,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_secs(self.robots_timeout_secs)
    }

    /// The configured floor as a `Duration`; invalid values collapse to zero
    pub fn crawl_delay_floor(&self) -> Duration {
        Duration::try_from_secs_f64(self.crawl_delay_floor_secs).unwrap_or(Duration::ZERO)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            robots_timeout_secs: 5,
            max_retries: 3,
            crawl_delay_floor_secs: 2.0,
            fetch_details: false,
            parallel_sources: false,
            max_articles_per_source: 20,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Full header value: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }

    /// The token matched against `User-agent:` lines in robots.txt
    pub fn product_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON file per source and run
    pub directory: String,

    /// Drop image URLs and keep text plus metadata only
    #[serde(default = "default_data_lite", rename = "data-lite")]
    pub data_lite: bool,
}

fn default_data_lite() -> bool {
    true
}

/// A news source and the adapter that understands its markup
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Short identifier used on the command line and in file names
    pub key: String,

    /// Human-readable outlet name
    pub name: String,

    /// Homepage URL; also the base for resolving relative links
    pub url: String,

    /// Which page-structure adapter to use
    pub adapter: AdapterKind,
}

/// Known page-structure adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    G1,
    Folha,
    Estadao,
}
