//! Shared constants for kotoba.
//!
//! Page sizes are kept per content kind; they happen to match today but are
//! tuned independently.

/// Vocabulary category list page size.
pub const VOCABULARY_PAGE_SIZE: usize = 8;

/// Grammar reference list page size.
pub const GRAMMAR_PAGE_SIZE: usize = 8;

/// Conversation list page size.
pub const CONVERSATION_PAGE_SIZE: usize = 8;

/// Practice question list page size.
pub const QUESTION_PAGE_SIZE: usize = 8;

/// Reading passage list page size.
pub const READING_PAGE_SIZE: usize = 8;

/// Page size used when a controller loads a whole list in one request.
pub const FULL_LIST_PAGE_SIZE: usize = 1000;

/// Default lifetime of cached list responses, in seconds.
pub const DEFAULT_LIST_CACHE_TTL_SECS: u64 = 300;

/// Default lifetime of cached pronunciation audio, in seconds (7 days).
pub const DEFAULT_AUDIO_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Persisted audio rows written with any other version are swept on startup.
pub const AUDIO_CACHE_FORMAT_VERSION: i64 = 2;

/// Delay between opening the audio cache and its one-time sweep, in milliseconds.
pub const AUDIO_SWEEP_DELAY_MS: u64 = 2_000;

/// Default GraphQL endpoint for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:4000/graphql";

/// Default generative-AI API base URL.
pub const DEFAULT_AI_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generative-AI model.
pub const DEFAULT_AI_MODEL: &str = "gemini-1.5-flash";

/// Default speech synthesis voice.
pub const DEFAULT_SPEECH_VOICE: &str = "ja-JP-Standard-A";
