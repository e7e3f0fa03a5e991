use url::Url;

/// List of tracking query parameters removed from article links
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Resolves an `href` found on a page into an absolute article URL
///
/// Returns None for links that can never be an article: empty hrefs,
/// `javascript:`, `mailto:` and `tel:` links, data URIs, and anything that
/// does not resolve to HTTP(S).
///
/// The fragment and tracking parameters are removed, so the same article
/// linked twice from a homepage resolves to the same string.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use espectro_crawler::url::resolve_link;
///
/// let base = Url::parse("https://g1.globo.com").unwrap();
/// let url = resolve_link("/politica/noticia.ghtml#comentarios", &base).unwrap();
/// assert_eq!(url.as_str(), "https://g1.globo.com/politica/noticia.ghtml");
/// ```
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Some(url)
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
