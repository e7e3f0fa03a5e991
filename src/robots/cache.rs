//! Per-run crawl policy cache
//!
//! Every domain gets exactly one `CrawlPolicy` per run. Entries never expire:
//! the store lives as long as the fetcher that owns it and is rebuilt from
//! scratch on every invocation.

use crate::robots::CrawlPolicy;
use crate::url::Domain;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Domain-keyed store of crawl policies
///
/// Population is single-flighted: concurrent callers asking for the same
/// unknown domain all wait on one initialization future, so at most one
/// robots.txt request is ever issued per domain.
#[derive(Debug, Default)]
pub struct PolicyStore {
    entries: Mutex<HashMap<Domain, Arc<OnceCell<Arc<CrawlPolicy>>>>>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached policy for `domain`, running `init` if there is none
    ///
    /// The map lock is only held to find or create the domain's cell; the
    /// (possibly slow) initializer runs without it, so unrelated domains are
    /// never blocked behind a robots.txt download.
    pub async fn get_or_init<F, Fut>(&self, domain: &Domain, init: F) -> Arc<CrawlPolicy>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CrawlPolicy>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(domain.clone()).or_default())
        };

        let policy = cell.get_or_init(|| async move { Arc::new(init().await) }).await;
        Arc::clone(policy)
    }

    /// Returns the cached policy for `domain` without fetching
    pub async fn get(&self, domain: &Domain) -> Option<Arc<CrawlPolicy>> {
        let entries = self.entries.lock().await;
        entries.get(domain).and_then(|cell| cell.get().cloned())
    }

    /// Number of domains with a resolved policy
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
