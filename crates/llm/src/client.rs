use async_trait::async_trait;
use kotoba_core::AiConfig;

use crate::ai_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, RequestPart};
use crate::error::LlmError;

/// Produces raw text for a prompt.
///
/// [`GenerativeClient`] is the production implementation; generators only
/// depend on this trait.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError>;
}

/// Client for a Gemini-style `generateContent` endpoint.
pub struct GenerativeClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
}

impl std::fmt::Debug for GenerativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeClient")
            .field("client", &self.client)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GenerativeClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: &str, model: String) -> Result<Self, LlmError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model })
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AiConfig) -> Result<Self, LlmError> {
        Self::new(config.api_key.clone(), &config.base_url, config.model.clone())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send one prompt and return the first candidate's text.
    ///
    /// Transport errors and transient statuses are retried with a fixed
    /// backoff; any other status fails immediately.
    ///
    /// # Errors
    /// Returns an error if every attempt fails, the API returns a
    /// non-transient status, the body cannot be parsed, or no text came back.
    pub async fn generate_content(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, LlmError> {
        const MAX_RETRIES: usize = 3;
        const RETRY_DELAYS: [u64; 4] = [0, 1, 2, 4];
        let request = GenerateContentRequest {
            contents: vec![Content { role: "user", parts: vec![RequestPart { text: prompt }] }],
            generation_config: config,
        };
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_secs = RETRY_DELAYS.get(attempt).copied().unwrap_or(4);
                let delay = std::time::Duration::from_secs(delay_secs);
                tokio::time::sleep(delay).await;
                tracing::warn!("AI retry attempt {attempt}/{MAX_RETRIES} after {delay:?}");
            }

            let response = match self
                .client
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::HttpRequest(e));
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        last_error = Some(LlmError::HttpRequest(e));
                        continue;
                    },
                };
                let parsed: GenerateContentResponse =
                    serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                        context: format!("generateContent response (body: {})", truncate(&body, 200)),
                        source: e,
                    })?;
                return parsed.first_text().ok_or(LlmError::EmptyResponse);
            }

            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            let err = LlmError::HttpStatus { code: status.as_u16(), body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(LlmError::RetriesExhausted(Box::new(last_error.unwrap_or(LlmError::EmptyResponse))))
    }
}

#[async_trait]
impl TextGenerator for GenerativeClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        self.generate_content(prompt, config).await
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
