//! State module for tracking fetch progress
//!
//! # Components
//!
//! - `FetchState`: the states one URL fetch moves through (policy check, rate limit, attempts)
//! - `DomainState`: per-domain request timing used by the rate limiter

mod domain_state;
mod fetch_state;

// Re-export main types
pub use domain_state::{effective_delay, DomainState};
pub use fetch_state::FetchState;
