/// Fetch state definitions for a single URL
///
/// This module defines the states one call to the resilient fetcher moves
/// through: `CheckPolicy -> RateLimit -> Attempt(1..=n) -> terminal`.
use std::fmt;

/// Represents the current state of one URL fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    // ===== Active States =====
    /// Resolving the domain's crawl policy and checking the path
    CheckPolicy,

    /// Waiting for the domain's crawl delay to elapse
    RateLimit,

    /// Performing HTTP attempt number `n` (1-based)
    Attempt(u32),

    // ===== Terminal States =====
    /// A document was retrieved and parsed
    Fetched,

    /// The crawl policy disallows the URL; no request was made
    Denied,

    /// Every attempt failed
    Exhausted,
}

impl FetchState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fetched | Self::Denied | Self::Exhausted)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched)
    }

    /// Checks if transitioning from this state to another is valid
    ///
    /// # Valid Transitions
    ///
    /// - CheckPolicy → RateLimit, Denied
    /// - RateLimit → Attempt(1)
    /// - Attempt(n) → Attempt(n + 1), Fetched, Exhausted
    /// - Terminal states → (none)
    pub fn can_transition_to(&self, next: FetchState) -> bool {
        match (self, next) {
            (Self::CheckPolicy, Self::RateLimit | Self::Denied) => true,
            (Self::RateLimit, Self::Attempt(1)) => true,
            (Self::Attempt(n), Self::Attempt(m)) => m == n + 1,
            (Self::Attempt(_), Self::Fetched | Self::Exhausted) => true,
            _ => false,
        }
    }

    /// Short label used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckPolicy => "check_policy",
            Self::RateLimit => "rate_limit",
            Self::Attempt(_) => "attempt",
            Self::Fetched => "fetched",
            Self::Denied => "denied",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempt(n) => write!(f, "attempt {}", n),
            other => f.write_str(other.as_str()),
        }
    }
}
