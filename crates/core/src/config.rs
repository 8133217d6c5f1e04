//! Application configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_AI_MODEL, DEFAULT_AI_URL, DEFAULT_API_URL, DEFAULT_AUDIO_CACHE_TTL_SECS,
    DEFAULT_LIST_CACHE_TTL_SECS, DEFAULT_SPEECH_VOICE,
};
use crate::env_config::{env_duration_secs, env_non_empty};

/// Generative-AI endpoint settings. Present only when an API key is configured.
#[derive(Clone)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .finish()
    }
}

/// Speech synthesis endpoint settings. Present only when a URL is configured.
#[derive(Clone)]
pub struct SpeechConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub voice: String,
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("voice", &self.voice)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GraphQL endpoint of the content API.
    pub api_url: String,
    pub ai: Option<AiConfig>,
    pub speech: Option<SpeechConfig>,
    pub list_cache_ttl: Duration,
    pub audio_cache_ttl: Duration,
    pub audio_db_path: PathBuf,
}

impl AppConfig {
    /// Reads `KOTOBA_*` variables, using defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let ai = env_non_empty("KOTOBA_AI_KEY").map(|api_key| AiConfig {
            base_url: env_non_empty("KOTOBA_AI_URL").unwrap_or_else(|| DEFAULT_AI_URL.to_owned()),
            api_key,
            model: env_non_empty("KOTOBA_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_owned()),
        });
        let speech = env_non_empty("KOTOBA_SPEECH_URL").map(|base_url| SpeechConfig {
            base_url,
            api_key: env_non_empty("KOTOBA_SPEECH_KEY"),
            voice: env_non_empty("KOTOBA_SPEECH_VOICE")
                .unwrap_or_else(|| DEFAULT_SPEECH_VOICE.to_owned()),
        });

        Self {
            api_url: env_non_empty("KOTOBA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            ai,
            speech,
            list_cache_ttl: env_duration_secs(
                "KOTOBA_LIST_CACHE_TTL_SECS",
                DEFAULT_LIST_CACHE_TTL_SECS,
            ),
            audio_cache_ttl: env_duration_secs(
                "KOTOBA_AUDIO_CACHE_TTL_SECS",
                DEFAULT_AUDIO_CACHE_TTL_SECS,
            ),
            audio_db_path: env_non_empty("KOTOBA_AUDIO_DB")
                .map_or_else(default_audio_db_path, PathBuf::from),
        }
    }
}

/// `<data_local_dir>/kotoba/audio.db`, or `./kotoba/audio.db` without a data dir.
#[must_use]
pub fn default_audio_db_path() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("kotoba").join("audio.db")
}
