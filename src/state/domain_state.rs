use crate::robots::CrawlPolicy;
use std::time::{Duration, Instant};

/// Tracks request timing for a single domain
///
/// Instants come from the monotonic clock, so wall-clock adjustments can
/// never produce a negative wait.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests gated for this domain in the current run
    pub request_count: u32,

    /// When the most recent request to this domain was let through
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    /// Creates a new DomainState with no recorded requests
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a request can be made now under the given delay
    pub fn can_request(&self, delay: Duration, now: Instant) -> bool {
        self.time_until_next_request(delay, now).is_none()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now (including the very first
    /// request to a domain), or the remaining wait otherwise.
    pub fn time_until_next_request(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        // saturating: `now` earlier than `last` counts as zero elapsed
        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            Some(delay - elapsed)
        } else {
            None
        }
    }

    /// Records that a request was made to this domain
    ///
    /// The timestamp only moves forward: recording an instant older than the
    /// stored one keeps the stored one.
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        match self.last_request_time {
            Some(last) if last >= now => {}
            _ => self.last_request_time = Some(now),
        }
    }
}

/// Calculates the effective delay for a domain
///
/// This takes the maximum of the configured floor and the robots.txt
/// crawl delay (if specified). A site can slow us down but never speed us up.
///
/// # Examples
///
/// ```
/// use espectro_crawler::robots::CrawlPolicy;
/// use espectro_crawler::state::effective_delay;
/// use std::time::Duration;
///
/// let policy = CrawlPolicy::from_content("User-agent: *\nCrawl-delay: 0.1", "EspectroBot");
/// assert_eq!(effective_delay(&policy, Duration::from_secs(2)), Duration::from_secs(2));
/// ```
pub fn effective_delay(policy: &CrawlPolicy, floor: Duration) -> Duration {
    let declared = policy
        .crawl_delay()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(Duration::ZERO);

    declared.max(floor)
}
