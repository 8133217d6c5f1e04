//! Remote content gateway for kotoba
//!
//! GraphQL client, per-kind list queries and a caching decorator.

mod cached;
mod error;
mod gateway;
mod graphql;
mod params;
mod queries;

pub use cached::{CachedGateway, ListCache};
pub use error::FetchFailure;
pub use gateway::{ContentGateway, RemoteGateway};
pub use graphql::GraphQlClient;
pub use params::ListParams;
pub use queries::{decode_page, document, root_field};
