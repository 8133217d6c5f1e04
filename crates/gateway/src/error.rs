//! Typed error enum for the gateway crate.

use thiserror::Error;

/// Any failure of a remote content call. No partial results are ever returned.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },

    /// The API answered with a non-empty `errors` array.
    #[error("GraphQL errors: {}", .0.join("; "))]
    Remote(Vec<String>),

    /// The reply lacked `data` or an expected field.
    #[error("malformed response: {0}")]
    Malformed(String),
}
