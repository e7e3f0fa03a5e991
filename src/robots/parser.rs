//! Robots.txt parser implementation
//!
//! Allow/disallow matching is delegated to the robotstxt crate, which
//! implements Google's robots-exclusion semantics (longest match wins,
//! `Allow` wins ties, specific user-agent groups replace the `*` group).
//! The crate does not expose `Crawl-delay`, so that directive is parsed here.

use robotstxt::DefaultMatcher;

/// Crawl policy of a single domain
///
/// Created once per domain and never mutated afterwards; shared behind an
/// `Arc` by everything that needs to consult it.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlPolicy {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Declared crawl delay for the configured user agent, in seconds
    crawl_delay: Option<f64>,
}

impl CrawlPolicy {
    /// Creates a policy from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    /// * `user_agent` - The product token whose `Crawl-delay` should be kept
    pub fn from_content(content: &str, user_agent: &str) -> Self {
        Self {
            content: content.to_string(),
            crawl_delay: parse_crawl_delay(content, user_agent),
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// Used when robots.txt is missing, unreachable, or unreadable. An
    /// unverifiable policy is treated as "allow", never as "deny all".
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            crawl_delay: None,
        }
    }

    /// Returns true if this policy has no rules at all
    pub fn is_permissive(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL to check (e.g., "https://example.com/page.html")
    /// * `user_agent` - The robots.txt product token
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_permissive() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Declared crawl delay in seconds, if the policy has one
    pub fn crawl_delay(&self) -> Option<f64> {
        self.crawl_delay
    }
}

/// Extracts the `Crawl-delay` that applies to `user_agent`
///
/// Consecutive `User-agent` lines form one group; the first rule line closes
/// the group's header. If any group names the agent, only specific groups
/// are consulted (even when they declare no delay); otherwise the `*` group
/// applies. Negative, non-finite and unparsable values are ignored.
fn parse_crawl_delay(content: &str, user_agent: &str) -> Option<f64> {
    let agent = user_agent.to_lowercase();

    let mut group_agents: Vec<String> = Vec::new();
    let mut in_group_header = false;

    let mut matched_specific = false;
    let mut delay_for_agent: Option<f64> = None;
    let mut delay_for_wildcard: Option<f64> = None;

    for line in content.lines() {
        // Strip trailing comments
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        if key == "user-agent" {
            if !in_group_header {
                group_agents.clear();
                in_group_header = true;
            }
            let ua = value.to_lowercase();
            if names_agent(&ua, &agent) {
                matched_specific = true;
            }
            group_agents.push(ua);
            continue;
        }

        in_group_header = false;

        if key != "crawl-delay" {
            continue;
        }

        let Some(delay) = value
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
        else {
            continue;
        };

        if group_agents.iter().any(|ua| names_agent(ua, &agent)) {
            delay_for_agent.get_or_insert(delay);
        } else if group_agents.iter().any(|ua| ua == "*") {
            delay_for_wildcard.get_or_insert(delay);
        }
    }

    if matched_specific {
        delay_for_agent
    } else {
        delay_for_wildcard
    }
}

/// Whether a lowercased `User-agent` value names `agent`
///
/// Only the product token counts (letters, `-` and `_`, so `EspectroBot/1.0`
/// names `espectrobot`), compared exactly, as `DefaultMatcher` does.
fn names_agent(ua: &str, agent: &str) -> bool {
    let token = ua
        .split(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .next()
        .unwrap_or("");
    !token.is_empty() && token == agent
}
