use std::collections::BTreeMap;

use kotoba_core::constants::FULL_LIST_PAGE_SIZE;
use kotoba_core::{ContentKind, ListQuery, SortDirection, SortKey};
use serde_json::{json, Value};

/// Server-side query parameters for one list request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListParams {
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub search: Option<String>,
    pub sort_field: Option<SortKey>,
    pub sort_direction: SortDirection,
    /// Categorical filters such as `level -> N4`.
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    #[must_use]
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            search: None,
            sort_field: None,
            sort_direction: SortDirection::Asc,
            filters: BTreeMap::new(),
        }
    }

    /// First page sized to hold an entire list in one response.
    #[must_use]
    pub fn full_list() -> Self {
        Self::new(1, FULL_LIST_PAGE_SIZE)
    }

    /// Server-side equivalent of a client [`ListQuery`].
    #[must_use]
    pub fn from_query(query: &ListQuery, page_size: usize) -> Self {
        let mut params = Self::new(query.page, page_size);
        let search = query.search.trim();
        if !search.is_empty() {
            params.search = Some(search.to_owned());
        }
        if query.sort != SortKey::Original {
            params.sort_field = Some(query.sort);
        }
        params.sort_direction = query.direction;
        if let Some(level) = query.level.level() {
            params.filters.insert("level".to_owned(), level.as_str().to_owned());
        }
        params
    }

    /// GraphQL variables object for this request.
    #[must_use]
    pub fn to_variables(&self) -> Value {
        json!({
            "page": self.page,
            "pageSize": self.page_size,
            "search": self.search,
            "sortField": self.sort_field.map(SortKey::as_str),
            "sortDirection": self.sort_direction.as_str().to_uppercase(),
            "filters": self.filters,
        })
    }

    /// Cache key unique to `kind` and these parameters.
    #[must_use]
    pub fn cache_key(&self, kind: ContentKind) -> String {
        format!("{kind}:{}", self.to_variables())
    }
}
