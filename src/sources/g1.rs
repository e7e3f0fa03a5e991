//! G1 (g1.globo.com) adapter
//!
//! The homepage is a feed of `div.feed-post-body` cards. G1 does not print
//! publication times on the feed, so listing entries carry the scrape time
//! until a detail page says otherwise.

use super::article::{extract_snippet, parse_iso_datetime, Article};
use super::{absolute_url, SiteAdapter, SourceProfile};
use crate::crawler::{
    attr, element_text, first_text, join_paragraphs, select_all, select_first, Document,
};
use crate::url::resolve_link;
use scraper::ElementRef;

/// Feed cards considered on the homepage
const MAX_CANDIDATES: usize = 20;

#[derive(Debug, Clone)]
pub struct G1Adapter {
    profile: SourceProfile,
}

impl G1Adapter {
    pub fn new(profile: SourceProfile) -> Self {
        Self { profile }
    }

    fn listing_entry(&self, card: ElementRef<'_>) -> Option<Article> {
        let link = select_first(card, "a.feed-post-link")?;
        let url = resolve_link(&attr(link, "href")?, &self.profile.base_url)?;

        let title = element_text(link);
        if title.is_empty() {
            return None;
        }

        let snippet = first_text(card, "div.feed-post-body-resumo")
            .unwrap_or_else(|| extract_snippet(&title));

        let mut article = Article::new(title, url.as_str(), snippet, &self.profile.name);

        // The picture sits beside the body, inside the enclosing feed post
        article.image_url = card
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|post| select_first(post, "img.bstn-fd-picture-image"))
            .and_then(|img| attr(img, "src"))
            .and_then(|src| absolute_url(&src, &self.profile.base_url));

        Some(article)
    }
}

impl SiteAdapter for G1Adapter {
    fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    fn extract_listing(&self, document: &Document) -> Vec<Article> {
        let html = document.html();
        let cards = select_all(html.root_element(), "div.feed-post-body");
        tracing::info!(
            source = %self.profile.key,
            candidates = cards.len().min(MAX_CANDIDATES),
            "Found article candidates"
        );

        cards
            .into_iter()
            .take(MAX_CANDIDATES)
            .filter_map(|card| self.listing_entry(card))
            .collect()
    }

    fn extract_details(&self, document: &Document, url: &str) -> Article {
        let html = document.html();
        let root = html.root_element();

        let title = first_text(root, "h1.content-head__title").unwrap_or_default();
        let body = join_paragraphs(select_all(root, "div.mc-article-body p"), 0);
        let snippet = first_text(root, "h2.content-head__subtitle")
            .unwrap_or_else(|| extract_snippet(&body));

        let mut article = Article::new(title, url, snippet, &self.profile.name);
        article.author = first_text(root, "p.content-publication-data__from");

        if let Some(published) = select_first(root, "time[datetime]")
            .and_then(|time| attr(time, "datetime"))
            .and_then(|raw| parse_iso_datetime(&raw))
        {
            article.published_at = published;
        }

        article.image_url = select_first(root, "div.progressive-img-container img")
            .and_then(|img| attr(img, "src"))
            .and_then(|src| absolute_url(&src, document.url()));
        article.full_text = Some(body).filter(|text| !text.is_empty());
        article
    }
}
