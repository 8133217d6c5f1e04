//! Per-view list state: fetched items, the current query and the visible page.
//!
//! Every state change produces a new immutable [`ListView`] that is both
//! returned and published on a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kotoba_core::{
    visible_page, ContentItem, ContentKind, LevelFilter, ListQuery, PagedResult, SortDirection,
    SortKey,
};
use kotoba_gateway::{CachedGateway, ContentGateway};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Snapshot of one list view, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub kind: ContentKind,
    pub query: ListQuery,
    pub page: PagedResult<ContentItem>,
    /// Message of the last failed fetch; cleared by the next success.
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct ControllerState {
    query: ListQuery,
    items: Vec<ContentItem>,
    error: Option<String>,
    loading: bool,
}

pub struct ListController<G> {
    kind: ContentKind,
    gateway: Arc<CachedGateway<G>>,
    state: Mutex<ControllerState>,
    /// Sequence number of the most recently issued fetch.
    latest_fetch: AtomicU64,
    views: watch::Sender<ListView>,
}

impl<G> std::fmt::Debug for ListController<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("kind", &self.kind)
            .field("latest_fetch", &self.latest_fetch.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<G: ContentGateway> ListController<G> {
    #[must_use]
    pub fn new(kind: ContentKind, gateway: Arc<CachedGateway<G>>) -> Self {
        let state = ControllerState::default();
        let (views, _) = watch::channel(render(kind, &state));
        Self { kind, gateway, state: Mutex::new(state), latest_fetch: AtomicU64::new(0), views }
    }

    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Receiver that always holds the latest [`ListView`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListView> {
        self.views.subscribe()
    }

    #[must_use]
    pub fn view(&self) -> ListView {
        render(self.kind, &self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change`, then render and publish the result.
    fn update(&self, change: impl FnOnce(&mut ControllerState)) -> ListView {
        let view = {
            let mut state = self.lock();
            change(&mut state);
            render(self.kind, &state)
        };
        self.views.send_replace(view.clone());
        view
    }

    pub fn set_search(&self, search: impl Into<String>) -> ListView {
        let search = search.into();
        self.update(|s| {
            s.query.search = search;
            s.query.page = 1;
        })
    }

    pub fn set_level(&self, level: LevelFilter) -> ListView {
        self.update(|s| {
            s.query.level = level;
            s.query.page = 1;
        })
    }

    pub fn set_sort(&self, sort: SortKey) -> ListView {
        self.update(|s| {
            s.query.sort = sort;
            s.query.page = 1;
        })
    }

    pub fn set_direction(&self, direction: SortDirection) -> ListView {
        self.update(|s| {
            s.query.direction = direction;
            s.query.page = 1;
        })
    }

    /// Change only the page; the other query fields are kept.
    pub fn set_page(&self, page: usize) -> ListView {
        self.update(|s| s.query.page = page.max(1))
    }

    /// Load the full list, answering from the cache when possible.
    pub async fn load(&self) -> ListView {
        self.fetch(false).await
    }

    /// Reload from the backend and overwrite the cached list.
    pub async fn refresh(&self) -> ListView {
        self.fetch(true).await
    }

    async fn fetch(&self, bypass_cache: bool) -> ListView {
        let seq = self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(|s| s.loading = true);

        let result = if bypass_cache {
            self.gateway.refresh_all(self.kind).await
        } else {
            self.gateway.fetch_all(self.kind).await
        };

        let view = {
            let mut state = self.lock();
            if self.latest_fetch.load(Ordering::SeqCst) != seq {
                debug!(kind = %self.kind, seq, "Discarding stale list response");
                return render(self.kind, &state);
            }
            match result {
                Ok(items) => {
                    debug!(kind = %self.kind, count = items.len(), "List loaded");
                    state.items = items;
                    state.error = None;
                },
                Err(e) => {
                    warn!(kind = %self.kind, "List fetch failed: {e}");
                    state.items.clear();
                    state.error = Some(e.to_string());
                },
            }
            state.loading = false;
            render(self.kind, &state)
        };
        self.views.send_replace(view.clone());
        view
    }
}

fn render(kind: ContentKind, state: &ControllerState) -> ListView {
    ListView {
        kind,
        query: state.query.clone(),
        page: visible_page(&state.items, &state.query, kind.page_size()),
        error: state.error.clone(),
        loading: state.loading,
    }
}
