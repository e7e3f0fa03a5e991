//! Article model and text helpers shared by the site adapters

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Longest snippet produced by [`extract_snippet`], in characters
pub const SNIPPET_MAX_CHARS: usize = 280;

/// One news article as scraped from a listing and, optionally, its detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub title: String,

    /// Absolute URL of the article page
    pub url: String,

    /// Short summary (outlet standfirst or the first sentences of the text)
    pub snippet: String,

    /// Human-readable outlet name
    pub source_name: String,

    /// Publication time, or scrape time when the page does not show one
    pub published_at: DateTime<Utc>,

    pub image_url: Option<String>,
    pub author: Option<String>,
    pub full_text: Option<String>,
}

impl Article {
    /// Creates a listing entry stamped with the current time
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source_name: source_name.into(),
            published_at: Utc::now(),
            image_url: None,
            author: None,
            full_text: None,
        }
    }

    /// Folds what a detail page revealed into this listing entry
    ///
    /// Non-empty detail values replace listing values; blanks never erase
    /// what the listing already had.
    pub fn merge_details(&mut self, details: Article) {
        if !details.title.is_empty() {
            self.title = details.title;
        }
        if !details.snippet.is_empty() {
            self.snippet = details.snippet;
        }
        self.published_at = details.published_at;
        if details.image_url.is_some() {
            self.image_url = details.image_url;
        }
        if details.author.is_some() {
            self.author = details.author;
        }
        if details.full_text.is_some() {
            self.full_text = details.full_text;
        }
    }
}

/// Builds a short summary from free text
///
/// Takes the first two `.`-separated sentences. Anything longer than
/// [`SNIPPET_MAX_CHARS`] is cut back to the last word boundary and gets a
/// trailing `...`.
///
/// # Examples
///
/// ```
/// use espectro_crawler::sources::extract_snippet;
///
/// assert_eq!(
///     extract_snippet("Inflação sobe. Juros devem subir. Mercado reage."),
///     "Inflação sobe. Juros devem subir"
/// );
/// ```
pub fn extract_snippet(text: &str) -> String {
    let snippet = text
        .split('.')
        .take(2)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect::<Vec<_>>()
        .join(". ");

    if snippet.chars().count() <= SNIPPET_MAX_CHARS {
        return snippet;
    }

    let cut: String = snippet.chars().take(SNIPPET_MAX_CHARS).collect();
    let head = match cut.rsplit_once(' ') {
        Some((head, _)) => head,
        None => cut.as_str(),
    };
    format!("{}...", head)
}

/// True if `text` contains any of the outlet's paywall phrases
pub fn is_paywalled(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| text.contains(marker))
}

/// Parses an ISO-8601 timestamp as found in `<time datetime="...">`
///
/// Offsets are honored; naive timestamps and bare dates are taken as UTC.
pub fn parse_iso_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a Brazilian `dd/mm/yyyy` date as midnight UTC
pub fn parse_brazilian_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
