//! Filter, sort and paginate an already-fetched list.
//!
//! Everything here is pure and synchronous: the same [`ListQuery`] over the
//! same input always yields the same [`PagedResult`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::content::ItemId;
use crate::error::CoreError;
use crate::level::{Level, LevelFilter};

/// Record that can be shown in a filtered list view.
pub trait Listable {
    /// Text fields the free-text search looks at.
    fn searchable_fields(&self) -> Vec<&str>;
    fn level(&self) -> Option<Level>;
    fn title(&self) -> &str;
    fn id(&self) -> &ItemId;
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the order the backend returned.
    #[default]
    Original,
    Title,
    Level,
    Id,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Title => "title",
            Self::Level => "level",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "original" | "none" => Ok(Self::Original),
            "title" | "name" => Ok(Self::Title),
            "level" => Ok(Self::Level),
            "id" => Ok(Self::Id),
            other => Err(CoreError::InvalidSortKey(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Search text, level filter, sort and page: everything that decides the visible page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub level: LevelFilter,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
    /// 1-based.
    pub page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            level: LevelFilter::All,
            sort: SortKey::Original,
            direction: SortDirection::Asc,
            page: 1,
        }
    }
}

/// One page of a filtered list plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> PagedResult<T> {
    #[must_use]
    pub fn empty(page_size: usize) -> Self {
        Self { items: Vec::new(), total_count: 0, total_pages: 1, page: 1, page_size }
    }
}

/// `max(1, ceil(count / page_size))`. A zero page size is treated as one.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Whether `item` passes the text search and level filter of `query`.
pub fn matches_query<T: Listable>(item: &T, needle: &str, level: LevelFilter) -> bool {
    if !level.matches(item.level()) {
        return false;
    }
    if needle.is_empty() {
        return true;
    }
    item.searchable_fields().iter().any(|field| field.to_lowercase().contains(needle))
}

/// Locale-aware sort key: compatibility-normalized and case-folded.
fn collation_key(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

fn compare_level(a: Option<Level>, b: Option<Level>) -> Ordering {
    // Items without a level go after every leveled item.
    match (a, b) {
        (Some(a), Some(b)) => a.rank().cmp(&b.rank()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_id(a: &ItemId, b: &ItemId) -> Ordering {
    match (a, b) {
        (ItemId::Int(a), ItemId::Int(b)) => a.cmp(b),
        (ItemId::Int(_), ItemId::Text(_)) => Ordering::Less,
        (ItemId::Text(_), ItemId::Int(_)) => Ordering::Greater,
        (ItemId::Text(a), ItemId::Text(b)) => compare_text(a, b),
    }
}

/// Stable sort in place. Equal elements keep their input order in both directions.
pub fn sort_items<T: Listable>(items: &mut [T], key: SortKey, direction: SortDirection) {
    let compare = |a: &T, b: &T| -> Ordering {
        match key {
            SortKey::Original => Ordering::Equal,
            SortKey::Title => compare_text(a.title(), b.title()),
            SortKey::Level => compare_level(a.level(), b.level()),
            SortKey::Id => compare_id(a.id(), b.id()),
        }
    };
    match direction {
        SortDirection::Asc => items.sort_by(compare),
        SortDirection::Desc => items.sort_by(|a, b| compare(b, a)),
    }
}

/// Compute the visible page of `items` for `query`.
///
/// Page `0` is read as page `1`. A page past the last one yields an empty
/// slice with the requested page number, never an error.
#[must_use]
pub fn visible_page<T: Listable + Clone>(
    items: &[T],
    query: &ListQuery,
    page_size: usize,
) -> PagedResult<T> {
    let page_size = page_size.max(1);
    let needle = query.search.trim().to_lowercase();

    let mut filtered: Vec<T> =
        items.iter().filter(|item| matches_query(*item, &needle, query.level)).cloned().collect();
    sort_items(&mut filtered, query.sort, query.direction);

    let total_count = filtered.len();
    let page = query.page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    let items = if start >= total_count {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(total_count);
        filtered.drain(start..end).collect()
    };

    PagedResult { items, total_count, total_pages: total_pages(total_count, page_size), page, page_size }
}
