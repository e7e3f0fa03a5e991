//! News site adapters
//!
//! Each outlet gets a small adapter that knows its markup. Adapters never
//! make HTTP requests themselves: they receive the shared
//! [`ResilientFetcher`] and only turn fetched documents into articles.
//!
//! # Components
//!
//! - `SiteAdapter`: the capability trait every outlet implements
//! - `SourceProfile`: identity and extraction options of one configured source
//! - `Article`: the scraped record written to the output files

mod article;
mod estadao;
mod folha;
mod g1;

pub use article::{
    extract_snippet, is_paywalled, parse_brazilian_date, parse_iso_datetime, Article,
    SNIPPET_MAX_CHARS,
};
pub use estadao::EstadaoAdapter;
pub use folha::FolhaAdapter;
pub use g1::G1Adapter;

use crate::config::{AdapterKind, Config, SourceEntry};
use crate::crawler::{Document, ResilientFetcher};
use crate::ConfigError;
use async_trait::async_trait;
use url::Url;

/// Identity and extraction options of one configured source
#[derive(Debug, Clone)]
pub struct SourceProfile {
    /// Short identifier used on the command line and in file names
    pub key: String,

    /// Human-readable outlet name, stamped into every article
    pub name: String,

    /// Homepage the listing is scraped from
    pub base_url: Url,

    /// Maximum number of listing entries kept
    pub max_articles: usize,

    /// Visit each article's own page after the listing
    pub fetch_details: bool,

    /// Drop image URLs from the output
    pub data_lite: bool,
}

impl SourceProfile {
    /// Builds a profile from a source entry and the run configuration
    pub fn from_entry(entry: &SourceEntry, config: &Config) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&entry.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", entry.url, e)))?;

        Ok(Self {
            key: entry.key.clone(),
            name: entry.name.clone(),
            base_url,
            max_articles: config.crawler.max_articles_per_source,
            fetch_details: config.crawler.fetch_details,
            data_lite: config.output.data_lite,
        })
    }
}

/// A news outlet the crawler knows how to read
///
/// Implementors provide the two synchronous extractors; the provided
/// [`fetch_and_extract`](Self::fetch_and_extract) drives the fetcher.
/// Extraction stays synchronous because a parsed `scraper::Html` is not
/// `Send` and must not be held across an `.await`.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn profile(&self) -> &SourceProfile;

    /// Turns the homepage into listing entries, in page order
    fn extract_listing(&self, document: &Document) -> Vec<Article>;

    /// Reads an article page; `url` is the listing URL of the article
    fn extract_details(&self, document: &Document, url: &str) -> Article;

    fn key(&self) -> &str {
        &self.profile().key
    }

    fn name(&self) -> &str {
        &self.profile().name
    }

    fn base_url(&self) -> &Url {
        &self.profile().base_url
    }

    /// Fetches the homepage and returns this source's articles
    ///
    /// An unavailable homepage yields an empty list. Detail pages that
    /// cannot be fetched leave their listing entry as it was.
    async fn fetch_and_extract(&self, fetcher: &ResilientFetcher) -> Vec<Article> {
        let profile = self.profile();

        let Some(homepage) = fetcher.fetch(&profile.base_url).await else {
            tracing::warn!(source = %profile.key, url = %profile.base_url, "Homepage unavailable");
            return Vec::new();
        };

        let mut articles = self.extract_listing(&homepage);
        articles.truncate(profile.max_articles);
        tracing::info!(
            source = %profile.key,
            count = articles.len(),
            "Extracted articles from homepage"
        );

        if profile.fetch_details {
            for article in articles.iter_mut() {
                let Ok(url) = Url::parse(&article.url) else {
                    continue;
                };
                if let Some(page) = fetcher.fetch(&url).await {
                    let details = self.extract_details(&page, &article.url);
                    article.merge_details(details);
                    tracing::debug!(source = %profile.key, url = %article.url, "Merged article details");
                }
            }
        }

        if profile.data_lite {
            for article in articles.iter_mut() {
                article.image_url = None;
            }
        }

        articles
    }
}

/// Resolves an image or link reference found on a page to an absolute URL
pub(crate) fn absolute_url(reference: &str, base: &Url) -> Option<String> {
    crate::url::resolve_link(reference, base).map(String::from)
}

/// Instantiates the adapters for the configured sources
///
/// With `only`, just that source is built; an unknown key is a configuration
/// error naming the available keys.
pub fn build_adapters(
    config: &Config,
    only: Option<&str>,
) -> Result<Vec<Box<dyn SiteAdapter>>, ConfigError> {
    let entries: Vec<&SourceEntry> = match only {
        Some(key) => match config.source(key) {
            Some(entry) => vec![entry],
            None => {
                return Err(ConfigError::Validation(format!(
                    "Unknown source '{}'. Available sources: {}",
                    key,
                    config.source_keys().join(", ")
                )))
            }
        },
        None => config.sources.iter().collect(),
    };

    entries
        .into_iter()
        .map(|entry| {
            let profile = SourceProfile::from_entry(entry, config)?;
            let adapter: Box<dyn SiteAdapter> = match entry.adapter {
                AdapterKind::G1 => Box::new(G1Adapter::new(profile)),
                AdapterKind::Folha => Box::new(FolhaAdapter::new(profile)),
                AdapterKind::Estadao => Box::new(EstadaoAdapter::new(profile)),
            };
            Ok(adapter)
        })
        .collect()
}
