//! Per-domain rate limiting
//!
//! This module handles:
//! - Enforcing the effective crawl delay between requests to one domain
//! - Integrating robots.txt crawl delays with the configured floor
//! - Serializing concurrent callers that target the same domain

use crate::robots::CrawlPolicy;
use crate::state::{effective_delay, DomainState};
use crate::url::Domain;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Gatekeeper that spaces requests to each domain
///
/// Each domain owns an async mutex around its `DomainState`. A caller holds
/// that mutex for the whole check-sleep-record sequence, so two callers for
/// the same domain can never both observe a stale timestamp. Callers for
/// different domains only share the brief map lookup.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum delay regardless of what robots.txt declares
    floor: Duration,

    /// Per-domain state tracking
    domain_states: Mutex<HashMap<Domain, Arc<Mutex<DomainState>>>>,
}

impl RateLimiter {
    /// Creates a new rate limiter
    ///
    /// # Arguments
    ///
    /// * `floor` - The configured minimum delay between requests to one domain
    pub fn new(floor: Duration) -> Self {
        Self {
            floor,
            domain_states: Mutex::new(HashMap::new()),
        }
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// Waits until a request to `domain` is allowed, then records it
    ///
    /// The first call for a domain returns immediately. Later calls sleep
    /// for whatever remains of the effective delay since the previous call
    /// was let through. The new timestamp is taken after the wait.
    ///
    /// Returns the time spent waiting.
    pub async fn await_turn(&self, domain: &Domain, policy: &CrawlPolicy) -> Duration {
        let delay = effective_delay(policy, self.floor);
        let state = self.domain_state(domain).await;

        // Held across the sleep: same-domain callers queue up here
        let mut state = state.lock().await;

        let waited = match state.time_until_next_request(delay, Instant::now()) {
            Some(wait) => {
                tracing::debug!(
                    %domain,
                    delay_ms = wait.as_millis() as u64,
                    "Rate limiting: sleeping before request"
                );
                tokio::time::sleep(wait).await;
                wait
            }
            None => Duration::ZERO,
        };

        state.record_request(Instant::now());
        waited
    }

    /// Number of requests let through for `domain` so far
    pub async fn request_count(&self, domain: &Domain) -> u32 {
        let state = self.domain_states.lock().await.get(domain).cloned();
        match state {
            Some(state) => state.lock().await.request_count,
            None => 0,
        }
    }

    /// Gets or creates the state cell for a domain
    async fn domain_state(&self, domain: &Domain) -> Arc<Mutex<DomainState>> {
        let mut states = self.domain_states.lock().await;
        Arc::clone(states.entry(domain.clone()).or_default())
    }
}
