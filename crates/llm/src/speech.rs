//! Speech synthesis with a persistent audio cache in front of it.

use std::sync::Arc;

use kotoba_core::SpeechConfig;
use kotoba_storage::AudioCache;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::truncate;
use crate::error::LlmError;

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// Client for a `POST {base}/v1/speech` text-to-speech endpoint.
pub struct SpeechClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    voice: String,
}

impl std::fmt::Debug for SpeechClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("voice", &self.voice)
            .finish()
    }
}

impl SpeechClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<String>, voice: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned(), api_key, voice })
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SpeechConfig) -> Result<Self, LlmError> {
        Self::new(&config.base_url, config.api_key.clone(), config.voice.clone())
    }

    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Synthesize `text` and return the encoded audio bytes.
    ///
    /// # Errors
    /// Transport failure, non-success status, or an empty body.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, LlmError> {
        let mut request = self
            .client
            .post(format!("{}/v1/speech", self.base_url))
            .json(&SpeechRequest { text, voice: &self.voice });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, 500).to_owned(),
            });
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}

/// Returns pronunciation audio, synthesizing only on a cache miss.
#[derive(Debug)]
pub struct Pronouncer {
    speech: SpeechClient,
    cache: Arc<AudioCache>,
}

impl Pronouncer {
    #[must_use]
    pub const fn new(speech: SpeechClient, cache: Arc<AudioCache>) -> Self {
        Self { speech, cache }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<AudioCache> {
        &self.cache
    }

    /// Audio for exactly `text`.
    ///
    /// # Errors
    /// Only when the cache misses and synthesis fails.
    pub async fn pronounce(&self, text: &str) -> Result<Vec<u8>, LlmError> {
        let cache = Arc::clone(&self.cache);
        let key = text.to_owned();
        let cached = tokio::task::spawn_blocking(move || cache.get(&key)).await.unwrap_or_else(|e| {
            warn!("Audio cache lookup task failed: {e}");
            None
        });
        if let Some(audio) = cached {
            debug!(chars = text.chars().count(), "Audio cache hit");
            return Ok(audio);
        }

        debug!(chars = text.chars().count(), "Audio cache miss, synthesizing");
        let audio = self.speech.synthesize(text).await?;

        let cache = Arc::clone(&self.cache);
        let key = text.to_owned();
        let stored = audio.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || cache.set(&key, &stored)).await {
            warn!("Audio cache store task failed: {e}");
        }
        Ok(audio)
    }
}
