use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Scheme plus host (and non-default port) of a URL
///
/// All crawl-policy and rate-limit state is keyed by `Domain`, never by the
/// full URL. Hosts are lowercased so `https://Example.com/a` and
/// `https://example.com/b` share one policy and one request timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Derives the domain of an HTTP(S) URL
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use espectro_crawler::url::Domain;
    ///
    /// let url = Url::parse("https://G1.globo.com/economia/").unwrap();
    /// assert_eq!(Domain::from_url(&url).unwrap().as_str(), "https://g1.globo.com");
    ///
    /// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
    /// assert_eq!(Domain::from_url(&url).unwrap().as_str(), "http://127.0.0.1:8080");
    /// ```
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(UrlError::InvalidScheme(scheme.to_string()));
        }

        let host = url.host_str().ok_or(UrlError::MissingDomain)?.to_lowercase();

        // `Url::port` is None when the port is the scheme default
        let domain = match url.port() {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        };

        Ok(Self(domain))
    }

    /// Parses a URL string and derives its domain
    pub fn parse(url: &str) -> UrlResult<Self> {
        let url = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(&url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of the domain's crawl-policy document
    pub fn robots_url(&self) -> String {
        format!("{}/robots.txt", self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
