//! Fetched documents and HTML extraction helpers
//!
//! This module handles:
//! - Holding a fetched page (final URL, status, body)
//! - Parsing the body into a `scraper::Html` tree on demand
//! - Small selector helpers shared by the site adapters

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A successfully fetched page
///
/// The body is kept as text and parsed on demand. `scraper::Html` is not
/// `Send`, so a parsed tree must never live across an `.await`; callers parse,
/// extract, and drop it inside a synchronous function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Final URL after redirects
    url: Url,

    /// HTTP status code (always 2xx)
    status: u16,

    /// Response body decoded as text
    body: String,
}

impl Document {
    pub fn new(url: Url, status: u16, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            body: body.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as an HTML document
    ///
    /// # Example
    ///
    /// ```
    /// use espectro_crawler::crawler::{select_first, Document};
    /// use url::Url;
    ///
    /// let doc = Document::new(
    ///     Url::parse("https://example.com/").unwrap(),
    ///     200,
    ///     "<html><body><h1>Hello</h1></body></html>",
    /// );
    /// let html = doc.html();
    /// let h1 = select_first(html.root_element(), "h1").unwrap();
    /// assert_eq!(h1.text().collect::<String>(), "Hello");
    /// ```
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Parses a CSS selector, logging instead of failing on a bad one
fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::error!(selector = css, error = ?e, "Invalid CSS selector");
            None
        }
    }
}

/// Returns every element under `scope` matching `css`, in document order
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Returns the first element under `scope` matching `css`
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(css)?;
    scope.select(&selector).next()
}

/// Text content of an element with whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|fragment| fragment.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element matching `css`, if present and non-empty
pub fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    select_first(scope, css)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Value of an attribute, if present and non-empty after trimming
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Joins paragraph texts with blank lines, keeping those longer than `min_chars`
pub fn join_paragraphs<'a>(
    paragraphs: impl IntoIterator<Item = ElementRef<'a>>,
    min_chars: usize,
) -> String {
    paragraphs
        .into_iter()
        .map(element_text)
        .filter(|text| text.chars().count() > min_chars)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Image source of the first `img` under `scope`, preferring lazy-load `data-src`
pub fn image_source(scope: ElementRef<'_>) -> Option<String> {
    let img = select_first(scope, "img")?;
    attr(img, "data-src").or_else(|| attr(img, "src"))
}
