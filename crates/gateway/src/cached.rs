use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use kotoba_core::{total_pages, ContentItem, ContentKind, PagedResult};
use kotoba_storage::TtlCache;
use tracing::debug;

use crate::error::FetchFailure;
use crate::gateway::ContentGateway;
use crate::params::ListParams;

/// Shared store of list responses, keyed by [`ListParams::cache_key`].
pub type ListCache = TtlCache<String, PagedResult<ContentItem>>;

/// Gateway decorator that answers from a [`ListCache`] when it can.
///
/// Failures are never cached; a failed fetch leaves any previous entry alone.
/// Every backend request takes a ticket when it starts, and a response may only
/// overwrite an entry written by an older ticket. A slow fetch that finishes
/// after a newer one for the same key is returned to its caller but not stored.
pub struct CachedGateway<G> {
    inner: G,
    cache: Arc<ListCache>,
    tickets: AtomicU64,
    /// Ticket of the response currently stored under each key.
    written: Mutex<HashMap<String, u64>>,
}

impl<G> std::fmt::Debug for CachedGateway<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedGateway").field("cache", &self.cache).finish_non_exhaustive()
    }
}

impl<G: ContentGateway> CachedGateway<G> {
    #[must_use]
    pub fn new(inner: G, cache: Arc<ListCache>) -> Self {
        Self { inner, cache, tickets: AtomicU64::new(0), written: Mutex::new(HashMap::new()) }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<ListCache> {
        &self.cache
    }

    fn ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `page` unless a newer request already wrote `key`.
    fn store(&self, key: String, ticket: u64, page: &PagedResult<ContentItem>) {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if written.get(&key).is_some_and(|&newest| newest > ticket) {
            debug!(%key, ticket, "Not caching out-of-date list response");
            return;
        }
        written.insert(key.clone(), ticket);
        self.cache.set(key, page.clone());
    }

    /// Fetch from the backend regardless of the cache and overwrite the entry.
    ///
    /// # Errors
    /// Whatever the wrapped gateway returns.
    pub async fn refresh_page(
        &self,
        kind: ContentKind,
        params: &ListParams,
    ) -> Result<PagedResult<ContentItem>, FetchFailure> {
        let ticket = self.ticket();
        let page = self.inner.fetch_page(kind, params).await?;
        self.store(params.cache_key(kind), ticket, &page);
        Ok(page)
    }

    /// Full-list variant of [`CachedGateway::refresh_page`].
    ///
    /// # Errors
    /// Whatever the wrapped gateway returns.
    pub async fn refresh_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, FetchFailure> {
        let ticket = self.ticket();
        let items = self.inner.fetch_all(kind).await?;
        self.store(ListParams::full_list().cache_key(kind), ticket, &whole_list(items.clone()));
        Ok(items)
    }

    /// Drop the entry for `kind` + `params`.
    pub fn invalidate(&self, kind: ContentKind, params: &ListParams) {
        self.cache.remove(params.cache_key(kind).as_str());
    }
}

/// A complete list stored under the full-list key.
fn whole_list(items: Vec<ContentItem>) -> PagedResult<ContentItem> {
    let params = ListParams::full_list();
    PagedResult {
        total_count: items.len(),
        total_pages: total_pages(items.len(), params.page_size),
        page: params.page,
        page_size: params.page_size,
        items,
    }
}

#[async_trait]
impl<G: ContentGateway> ContentGateway for CachedGateway<G> {
    async fn fetch_page(
        &self,
        kind: ContentKind,
        params: &ListParams,
    ) -> Result<PagedResult<ContentItem>, FetchFailure> {
        let key = params.cache_key(kind);
        if let Some(page) = self.cache.get(key.as_str()) {
            debug!(%kind, page = params.page, "List cache hit");
            return Ok(page);
        }
        debug!(%kind, page = params.page, "List cache miss");
        let ticket = self.ticket();
        let page = self.inner.fetch_page(kind, params).await?;
        self.store(key, ticket, &page);
        Ok(page)
    }

    /// Whole list from one cache entry, fetched page by page on a miss.
    async fn fetch_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, FetchFailure> {
        let key = ListParams::full_list().cache_key(kind);
        if let Some(list) = self.cache.get(key.as_str()) {
            debug!(%kind, "Full list cache hit");
            return Ok(list.items);
        }
        debug!(%kind, "Full list cache miss");
        let ticket = self.ticket();
        let items = self.inner.fetch_all(kind).await?;
        self.store(key, ticket, &whole_list(items.clone()));
        Ok(items)
    }
}
