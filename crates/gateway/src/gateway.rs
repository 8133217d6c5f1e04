//! Content gateway abstraction
//!
//! Controllers talk to [`ContentGateway`] only, so the remote backend, the
//! cached decorator and test fakes are interchangeable.

use async_trait::async_trait;
use kotoba_core::{ContentItem, ContentKind, PagedResult};
use tracing::{debug, warn};

use crate::error::FetchFailure;
use crate::graphql::GraphQlClient;
use crate::params::ListParams;
use crate::queries::{decode_page, document};

/// Source of paginated study content.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Fetch one page of `kind` matching `params`.
    async fn fetch_page(
        &self,
        kind: ContentKind,
        params: &ListParams,
    ) -> Result<PagedResult<ContentItem>, FetchFailure>;

    /// Whole list of `kind`, requested in large pages until the backend's
    /// `total_pages` is reached or a page comes back empty.
    async fn fetch_all(&self, kind: ContentKind) -> Result<Vec<ContentItem>, FetchFailure> {
        let mut params = ListParams::full_list();
        let first = self.fetch_page(kind, &params).await?;
        let (total_count, last_page) = (first.total_count, first.total_pages);
        let mut items = first.items;
        while params.page < last_page && items.len() < total_count {
            params.page += 1;
            let next = self.fetch_page(kind, &params).await?;
            if next.items.is_empty() {
                break;
            }
            items.extend(next.items);
        }
        if items.len() < total_count {
            warn!(%kind, received = items.len(), total_count, "Backend returned a partial list");
        }
        Ok(items)
    }
}

/// [`ContentGateway`] backed by the GraphQL content API.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: GraphQlClient,
}

impl RemoteGateway {
    #[must_use]
    pub const fn new(client: GraphQlClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_endpoint(endpoint: impl Into<String>) -> Result<Self, FetchFailure> {
        Ok(Self::new(GraphQlClient::new(endpoint)?))
    }
}

#[async_trait]
impl ContentGateway for RemoteGateway {
    async fn fetch_page(
        &self,
        kind: ContentKind,
        params: &ListParams,
    ) -> Result<PagedResult<ContentItem>, FetchFailure> {
        debug!(%kind, page = params.page, page_size = params.page_size, "Fetching content page");
        let data: serde_json::Map<String, serde_json::Value> =
            self.client.execute(&document(kind), &params.to_variables()).await?;
        decode_page(kind, data, params.page_size)
    }
}
