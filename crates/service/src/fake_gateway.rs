//! Scripted in-process gateway for controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kotoba_core::{total_pages, ContentItem, ContentKind, ContentPayload, ItemId, Level, PagedResult};
use kotoba_gateway::{ContentGateway, FetchFailure, ListParams};
use tokio::sync::Notify;

pub(crate) struct Reply {
    result: Result<Vec<ContentItem>, u16>,
    gate: Option<Arc<Notify>>,
}

impl Reply {
    pub(crate) fn items(items: Vec<ContentItem>) -> Self {
        Self { result: Ok(items), gate: None }
    }

    pub(crate) fn status(code: u16) -> Self {
        Self { result: Err(code), gate: None }
    }

    /// Hold the reply until `gate` is notified.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[derive(Default)]
struct Script {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    started: Notify,
}

/// Pops one scripted [`Reply`] per call; an empty script answers with no items.
///
/// Clones share the same script, so a test can keep a handle for inspection.
#[derive(Clone, Default)]
pub(crate) struct FakeGateway {
    script: Arc<Script>,
}

impl FakeGateway {
    pub(crate) fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
        let script = Script { replies: Mutex::new(replies.into_iter().collect()), ..Script::default() };
        Self { script: Arc::new(script) }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    /// Resolves once a call has started (or immediately if one started unobserved).
    pub(crate) async fn call_started(&self) {
        self.script.started.notified().await;
    }
}

#[async_trait]
impl ContentGateway for FakeGateway {
    async fn fetch_page(
        &self,
        _kind: ContentKind,
        params: &ListParams,
    ) -> Result<PagedResult<ContentItem>, FetchFailure> {
        self.script.calls.fetch_add(1, Ordering::SeqCst);
        let reply =
            self.script.replies.lock().unwrap().pop_front().unwrap_or(Reply::items(Vec::new()));
        self.script.started.notify_one();
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        let items = reply
            .result
            .map_err(|code| FetchFailure::HttpStatus { code, body: "scripted".to_owned() })?;
        Ok(PagedResult {
            total_count: items.len(),
            total_pages: total_pages(items.len(), params.page_size),
            page: params.page,
            page_size: params.page_size,
            items,
        })
    }
}

pub(crate) fn grammar(id: i64, title: &str, level: Option<Level>) -> ContentItem {
    ContentItem {
        id: ItemId::Int(id),
        title: title.to_owned(),
        description: None,
        level,
        payload: ContentPayload::Grammar {
            pattern: title.to_owned(),
            meaning: format!("meaning of {title}"),
            examples: Vec::new(),
        },
    }
}

/// `count` grammar points titled `g1..gN`, cycling through the five levels.
pub(crate) fn grammar_list(count: i64) -> Vec<ContentItem> {
    (1..=count)
        .map(|i| {
            let level = Level::ALL.get(usize::try_from(i).unwrap() % Level::ALL.len()).copied();
            grammar(i, &format!("g{i}"), level)
        })
        .collect()
}
