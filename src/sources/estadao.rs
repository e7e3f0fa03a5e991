//! O Estado de S. Paulo (estadao.com.br) adapter
//!
//! The homepage markup is less regular than the other outlets: stories are
//! `div.noticia` blocks on some layouts and bare `article` elements on
//! others, and navigation links are mixed in. Short titles are treated as
//! navigation and skipped.

use super::article::{
    extract_snippet, is_paywalled, parse_brazilian_date, parse_iso_datetime, Article,
};
use super::{absolute_url, SiteAdapter, SourceProfile};
use crate::crawler::{
    attr, element_text, first_text, image_source, join_paragraphs, select_all, select_first,
    Document,
};
use crate::url::resolve_link;
use chrono::{DateTime, Utc};
use scraper::ElementRef;
use std::collections::HashSet;

/// Candidates taken from each homepage selector
const MAX_PER_SELECTOR: usize = 15;

/// Below this many `div.noticia` blocks, `article` elements are scanned too
const MIN_PRIMARY_CANDIDATES: usize = 10;

/// Titles shorter than this are navigation links
const MIN_TITLE_CHARS: usize = 20;

/// Paragraphs this short are captions, bylines or widgets
const MIN_PARAGRAPH_CHARS: usize = 50;

const PAYWALL_MARKERS: &[&str] = &["Assine o Estadão", "Cadastro gratuito"];

#[derive(Debug, Clone)]
pub struct EstadaoAdapter {
    profile: SourceProfile,
}

impl EstadaoAdapter {
    pub fn new(profile: SourceProfile) -> Self {
        Self { profile }
    }

    fn listing_entry(&self, element: ElementRef<'_>) -> Option<Article> {
        let link = select_first(element, "a")?;

        let title = first_text(link, "h2")
            .or_else(|| first_text(link, "h3"))
            .or_else(|| first_text(link, "span.titulo"))
            .unwrap_or_else(|| element_text(link));
        if title.chars().count() < MIN_TITLE_CHARS {
            return None;
        }

        let url = resolve_link(&attr(link, "href")?, &self.profile.base_url)?;

        let snippet = first_text(element, "p.intro")
            .or_else(|| first_text(element, "p"))
            .unwrap_or_else(|| extract_snippet(&title));

        let mut article = Article::new(title, url.as_str(), snippet, &self.profile.name);
        article.image_url =
            image_source(element).and_then(|src| absolute_url(&src, &self.profile.base_url));
        Some(article)
    }
}

/// Reads a publication date from a `time` or `span.data` element
///
/// The `datetime` attribute wins over the visible text. Both ISO timestamps
/// and `dd/mm/yyyy` dates are understood.
fn published_at(root: ElementRef<'_>) -> Option<DateTime<Utc>> {
    let element = select_first(root, "time").or_else(|| select_first(root, "span.data"))?;
    let raw = attr(element, "datetime").unwrap_or_else(|| element_text(element));
    parse_iso_datetime(&raw).or_else(|| parse_brazilian_date(&raw))
}

impl SiteAdapter for EstadaoAdapter {
    fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    fn extract_listing(&self, document: &Document) -> Vec<Article> {
        let html = document.html();
        let root = html.root_element();

        let mut candidates: Vec<ElementRef<'_>> = select_all(root, "div.noticia")
            .into_iter()
            .take(MAX_PER_SELECTOR)
            .collect();
        if candidates.len() < MIN_PRIMARY_CANDIDATES {
            candidates.extend(select_all(root, "article").into_iter().take(MAX_PER_SELECTOR));
        }
        tracing::info!(
            source = %self.profile.key,
            candidates = candidates.len(),
            "Found article candidates"
        );

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter_map(|element| self.listing_entry(element))
            .filter(|article| seen.insert(article.url.clone()))
            .collect()
    }

    fn extract_details(&self, document: &Document, url: &str) -> Article {
        let html = document.html();
        let root = html.root_element();

        let title = first_text(root, "h1").unwrap_or_default();
        let subtitle = first_text(root, "h2.subtitle")
            .or_else(|| first_text(root, "p.intro"))
            .unwrap_or_default();

        let mut body = select_first(root, "article")
            .or_else(|| select_first(root, "div.content"))
            .map(|container| join_paragraphs(select_all(container, "p"), MIN_PARAGRAPH_CHARS))
            .unwrap_or_default();

        if is_paywalled(&body, PAYWALL_MARKERS) {
            tracing::warn!(%url, "Paywall detected, keeping subtitle only");
            body = subtitle.clone();
        }

        let snippet = if subtitle.is_empty() {
            extract_snippet(&body)
        } else {
            subtitle
        };

        let mut article = Article::new(title, url, snippet, &self.profile.name);
        article.author =
            first_text(root, "span.autor").or_else(|| first_text(root, "a.autor"));
        if let Some(published) = published_at(root) {
            article.published_at = published;
        }
        article.image_url = select_first(root, "figure")
            .or_else(|| select_first(root, "div.foto"))
            .and_then(image_source)
            .and_then(|src| absolute_url(&src, document.url()));
        article.full_text = Some(body).filter(|text| !text.is_empty());
        article
    }
}
