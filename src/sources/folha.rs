//! Folha de S.Paulo (folha.uol.com.br) adapter
//!
//! Headlines live in `div.c-headline` blocks. Article pages sit behind a
//! metered paywall; when the body is replaced by a subscription prompt the
//! article keeps its subtitle as text instead.

use super::article::{extract_snippet, is_paywalled, parse_iso_datetime, Article};
use super::{absolute_url, SiteAdapter, SourceProfile};
use crate::crawler::{
    attr, element_text, first_text, image_source, join_paragraphs, select_all, select_first,
    Document,
};
use crate::url::resolve_link;
use scraper::ElementRef;

/// Headline blocks considered on the homepage
const MAX_CANDIDATES: usize = 20;

/// Phrases that only appear when the article body is withheld
const PAYWALL_MARKERS: &[&str] = &["Cadastre-se gratuitamente", "Assine a Folha"];

#[derive(Debug, Clone)]
pub struct FolhaAdapter {
    profile: SourceProfile,
}

impl FolhaAdapter {
    pub fn new(profile: SourceProfile) -> Self {
        Self { profile }
    }

    fn listing_entry(&self, headline: ElementRef<'_>) -> Option<Article> {
        let link = select_first(headline, "a.c-headline__url")
            .or_else(|| select_first(headline, "a"))?;
        let url = resolve_link(&attr(link, "href")?, &self.profile.base_url)?;

        let title = first_text(link, "h2")
            .or_else(|| first_text(link, "h3"))
            .unwrap_or_else(|| element_text(link));
        if title.is_empty() {
            return None;
        }

        let snippet = first_text(headline, "p.c-headline__standfirst")
            .unwrap_or_else(|| extract_snippet(&title));

        let mut article = Article::new(title, url.as_str(), snippet, &self.profile.name);
        article.image_url =
            image_source(headline).and_then(|src| absolute_url(&src, &self.profile.base_url));
        Some(article)
    }
}

impl SiteAdapter for FolhaAdapter {
    fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    fn extract_listing(&self, document: &Document) -> Vec<Article> {
        let html = document.html();
        let headlines = select_all(html.root_element(), "div.c-headline");
        tracing::info!(
            source = %self.profile.key,
            candidates = headlines.len().min(MAX_CANDIDATES),
            "Found article candidates"
        );

        headlines
            .into_iter()
            .take(MAX_CANDIDATES)
            .filter_map(|headline| self.listing_entry(headline))
            .collect()
    }

    fn extract_details(&self, document: &Document, url: &str) -> Article {
        let html = document.html();
        let root = html.root_element();

        let title = first_text(root, "h1.c-content-head__title").unwrap_or_default();
        let subtitle = first_text(root, "h2.c-content-head__subtitle").unwrap_or_default();

        let mut body = String::new();
        if let Some(container) = select_first(root, "div.c-news__body") {
            let mut paragraphs = select_all(container, "p.c-news__paragraph");
            if paragraphs.is_empty() {
                paragraphs = select_all(container, "p");
            }
            body = join_paragraphs(paragraphs, 0);
        }

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
        article.author = first_text(root, "p.c-signature__author");

        if let Some(published) = select_first(root, "time.c-signature__time")
            .and_then(|time| attr(time, "datetime"))
            .and_then(|raw| parse_iso_datetime(&raw))
        {
            article.published_at = published;
        }

        article.image_url = select_first(root, "div.c-news__image")
            .and_then(image_source)
            .and_then(|src| absolute_url(&src, document.url()));
        article.full_text = Some(body).filter(|text| !text.is_empty());
        article
    }
}
