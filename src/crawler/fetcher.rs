//! Resilient HTTP fetcher
//!
//! This module handles every page request the crawler makes, including:
//! - Building the HTTP client with the identifying user agent string
//! - Consulting the domain's crawl policy before any request
//! - Waiting for the domain's rate-limit turn
//! - Bounded, immediate retries for transient failures
//! - Failure classification and per-run fetch counters

use super::parser::Document;
use super::scheduler::RateLimiter;
use crate::config::{Config, UserAgentConfig};
use crate::robots::PolicyFetcher;
use crate::state::FetchState;
use crate::url::Domain;
use reqwest::{redirect::Policy, Client};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The request or the body download timed out
    Timeout,

    /// The connection could not be established
    Connect,

    /// The server answered with a non-2xx status
    Status(u16),

    /// The body could not be read or decoded as text
    Body(String),

    /// Any other transport error
    Other(String),
}

impl FailureKind {
    /// Classifies a transport error returned by `send()`
    fn from_send_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else {
            Self::Other(error.to_string())
        }
    }

    /// Classifies an error returned while reading the body
    fn from_body_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Body(error.to_string())
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("request timed out"),
            Self::Connect => f.write_str("connection failed"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Body(e) => write!(f, "unreadable body: {}", e),
            Self::Other(e) => f.write_str(e),
        }
    }
}

/// Final result of one `fetch_outcome` call
#[derive(Debug)]
pub enum FetchOutcome {
    /// A 2xx response with a readable body
    Fetched(Document),

    /// The crawl policy disallows the URL; nothing was requested
    Denied,

    /// Every attempt failed
    Exhausted {
        attempts: u32,
        last_failure: FailureKind,
    },

    /// The URL has no crawlable domain (not http(s), or no host)
    Invalid(String),
}

impl FetchOutcome {
    /// The terminal state this outcome corresponds to, if any
    pub fn state(&self) -> Option<FetchState> {
        match self {
            Self::Fetched(_) => Some(FetchState::Fetched),
            Self::Denied => Some(FetchState::Denied),
            Self::Exhausted { .. } => Some(FetchState::Exhausted),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Discards the failure detail, keeping only the document
    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Fetched(document) => Some(document),
            _ => None,
        }
    }
}

/// Per-run fetch counters
///
/// Policy denials are tracked separately from exhausted retries so the two
/// can be told apart after a run even though `fetch` reports both as `None`.
#[derive(Debug, Default)]
pub struct FetchStats {
    fetched: AtomicU64,
    denied: AtomicU64,
    exhausted: AtomicU64,
    attempts: AtomicU64,
}

impl FetchStats {
    pub fn snapshot(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`FetchStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStatsSnapshot {
    /// URLs that produced a document
    pub fetched: u64,

    /// URLs refused by robots.txt
    pub denied: u64,

    /// URLs that failed every attempt
    pub exhausted: u64,

    /// HTTP attempts made for page requests (robots.txt not included)
    pub attempts: u64,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `request_timeout` - Default timeout for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use espectro_crawler::config::UserAgentConfig;
/// use espectro_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "EspectroBot".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://espectro.app".to_string(),
///     contact_email: "contact@espectro.app".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Policy-aware, rate-limited fetcher with a bounded retry budget
///
/// One instance is created per run. It owns the policy store and the rate
/// limiter, so nothing leaks between runs and tests get a clean slate.
#[derive(Debug)]
pub struct ResilientFetcher {
    client: Client,
    policies: PolicyFetcher,
    limiter: RateLimiter,
    request_timeout: Duration,
    max_retries: u32,
    stats: FetchStats,
}

impl ResilientFetcher {
    /// Creates a fetcher from the run configuration
    pub fn new(config: &Config) -> crate::Result<Self> {
        let crawler = &config.crawler;
        let client = build_http_client(&config.user_agent, crawler.request_timeout())?;

        let policies = PolicyFetcher::new(
            client.clone(),
            config.user_agent.product_token(),
            crawler.robots_timeout(),
        );

        Ok(Self {
            client,
            policies,
            limiter: RateLimiter::new(crawler.crawl_delay_floor()),
            request_timeout: crawler.request_timeout(),
            max_retries: crawler.max_retries.max(1),
            stats: FetchStats::default(),
        })
    }

    /// Fetches `url`, returning the document or `None`
    ///
    /// `None` covers both a policy denial and exhausted retries; use
    /// [`fetch_outcome`](Self::fetch_outcome) or [`stats`](Self::stats) to
    /// tell them apart.
    pub async fn fetch(&self, url: &Url) -> Option<Document> {
        self.fetch_outcome(url).await.into_document()
    }

    /// Fetches `url` and reports exactly how it ended
    ///
    /// # Flow
    ///
    /// 1. Resolve the domain's crawl policy; a disallowed URL ends here
    /// 2. Wait for the domain's rate-limit turn (once per call)
    /// 3. Up to `max_retries` attempts, back to back; the first 2xx with a
    ///    readable body wins
    pub async fn fetch_outcome(&self, url: &Url) -> FetchOutcome {
        let mut state = FetchState::CheckPolicy;

        let domain = match Domain::from_url(url) {
            Ok(domain) => domain,
            Err(e) => {
                tracing::warn!(%url, error = %e, "Skipping URL without a crawlable domain");
                return FetchOutcome::Invalid(e.to_string());
            }
        };

        let policy = self.policies.resolve(&domain).await;
        if !policy.is_allowed(url.as_str(), self.policies.user_agent()) {
            advance(&mut state, FetchState::Denied, url);
            FetchStats::bump(&self.stats.denied);
            tracing::warn!(%url, reason = "robots", "Blocked by robots.txt");
            return FetchOutcome::Denied;
        }

        advance(&mut state, FetchState::RateLimit, url);
        self.limiter.await_turn(&domain, &policy).await;

        let mut last_failure = FailureKind::Other("no attempt made".to_string());
        for attempt in 1..=self.max_retries {
            advance(&mut state, FetchState::Attempt(attempt), url);
            FetchStats::bump(&self.stats.attempts);

            match self.attempt(url).await {
                Ok(document) => {
                    advance(&mut state, FetchState::Fetched, url);
                    FetchStats::bump(&self.stats.fetched);
                    tracing::debug!(%url, attempt, status = document.status(), "Fetched");
                    return FetchOutcome::Fetched(document);
                }
                Err(failure) => {
                    tracing::warn!(
                        %url,
                        attempt,
                        max_attempts = self.max_retries,
                        failure = %failure,
                        "Fetch attempt failed"
                    );
                    last_failure = failure;
                }
            }
        }

        advance(&mut state, FetchState::Exhausted, url);
        FetchStats::bump(&self.stats.exhausted);
        tracing::error!(
            %url,
            attempts = self.max_retries,
            last_failure = %last_failure,
            "Giving up after all attempts failed"
        );

        FetchOutcome::Exhausted {
            attempts: self.max_retries,
            last_failure,
        }
    }

    /// One GET request, with no policy check and no rate limiting
    async fn attempt(&self, url: &Url) -> Result<Document, FailureKind> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| FailureKind::from_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureKind::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FailureKind::from_body_error(&e))?;

        Ok(Document::new(final_url, status.as_u16(), body))
    }

    /// Counters accumulated since this fetcher was created
    pub fn stats(&self) -> FetchStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn policies(&self) -> &PolicyFetcher {
        &self.policies
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Moves the per-URL state machine forward
fn advance(state: &mut FetchState, next: FetchState, url: &Url) {
    debug_assert!(
        state.can_transition_to(next),
        "invalid fetch transition {} -> {}",
        state,
        next
    );
    tracing::trace!(%url, from = %state, to = %next, "Fetch state");
    *state = next;
}
