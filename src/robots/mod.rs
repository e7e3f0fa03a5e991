//! Robots.txt handling module
//!
//! This module provides fetching, parsing, and caching of robots.txt files.
//! A failed lookup never blocks crawling: anything other than a readable
//! HTTP 200 response yields a permissive policy.

mod cache;
mod parser;

pub use cache::PolicyStore;
pub use parser::CrawlPolicy;

use crate::url::Domain;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Resolves and caches the crawl policy of each domain
#[derive(Debug)]
pub struct PolicyFetcher {
    client: Client,
    user_agent: String,
    timeout: Duration,
    store: PolicyStore,
}

impl PolicyFetcher {
    /// Creates a new policy fetcher
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client (already carrying the User-Agent header)
    /// * `user_agent` - The robots.txt product token to evaluate rules for
    /// * `timeout` - Timeout for a single robots.txt request
    pub fn new(client: Client, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            timeout,
            store: PolicyStore::new(),
        }
    }

    /// The product token rules are evaluated for
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the policy for `domain`, fetching robots.txt on first use
    ///
    /// The first call for a domain issues one GET to `/robots.txt`; every
    /// later call (including concurrent ones) is answered from the store.
    pub async fn resolve(&self, domain: &Domain) -> Arc<CrawlPolicy> {
        self.store
            .get_or_init(domain, || {
                fetch_robots(&self.client, domain, &self.user_agent, self.timeout)
            })
            .await
    }

    /// The underlying cache
    pub fn store(&self) -> &PolicyStore {
        &self.store
    }
}

/// Fetches and parses robots.txt for a domain
///
/// Every failure mode falls back to [`CrawlPolicy::allow_all`]; the caller
/// never sees an error.
pub async fn fetch_robots(
    client: &Client,
    domain: &Domain,
    user_agent: &str,
    timeout: Duration,
) -> CrawlPolicy {
    let robots_url = domain.robots_url();
    tracing::info!(url = %robots_url, "Fetching robots.txt");

    let response = match client.get(&robots_url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                url = %robots_url,
                error = %e,
                "Could not fetch robots.txt, allowing all paths"
            );
            return CrawlPolicy::allow_all();
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!(
            url = %robots_url,
            status = status.as_u16(),
            "No robots.txt found, allowing all paths"
        );
        return CrawlPolicy::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            let policy = CrawlPolicy::from_content(&body, user_agent);
            tracing::info!(
                %domain,
                crawl_delay = ?policy.crawl_delay(),
                "Parsed robots.txt"
            );
            policy
        }
        Err(e) => {
            tracing::warn!(
                url = %robots_url,
                error = %e,
                "Could not read robots.txt body, allowing all paths"
            );
            CrawlPolicy::allow_all()
        }
    }
}
