use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchFailure;

/// Maximum characters of an error body kept in [`FetchFailure::HttpStatus`].
const MAX_ERROR_BODY_LEN: usize = 500;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// Client for a single GraphQL POST endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchFailure> {
        let client =
            reqwest::Client::builder().timeout(std::time::Duration::from_secs(30)).build()?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one query. Exactly one request is made; nothing is retried.
    ///
    /// # Errors
    /// Transport failure, a non-success status, a non-empty `errors` array
    /// (checked before `data`), or a missing/mistyped `data` field.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &Value,
    ) -> Result<T, FetchFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let body = body.chars().take(MAX_ERROR_BODY_LEN).collect();
            return Err(FetchFailure::HttpStatus { code: status.as_u16(), body });
        }

        let parsed: GraphQlResponse = serde_json::from_str(&body)
            .map_err(|e| FetchFailure::Malformed(format!("response body: {e}")))?;

        let errors = parsed.errors.unwrap_or_default();
        if !errors.is_empty() {
            return Err(FetchFailure::Remote(errors.into_iter().map(|e| e.message).collect()));
        }
        let data = parsed
            .data
            .filter(|d| !d.is_null())
            .ok_or_else(|| FetchFailure::Malformed("missing `data`".to_owned()))?;
        serde_json::from_value(data).map_err(|e| FetchFailure::Malformed(format!("data: {e}")))
    }
}
