//! Best-effort study content generation.
//!
//! Every operation returns usable content: a failed request, unparseable
//! reply or invalid payload is logged and replaced with a fixed fallback.

use std::sync::Arc;

use kotoba_core::{parse_payload, salvage_string_field, Level, Validate};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::ai_types::GenerationConfig;
use crate::client::{truncate, TextGenerator};
use crate::conversation::{self, ConversationReply};
use crate::question::{self, MultipleChoiceQuestion};
use crate::reading::{self, ReadingPassage};

/// How a generated value was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated<T> {
    Fresh(T),
    Fallback(T),
}

impl<T> Generated<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Fresh(v) | Self::Fallback(v) => v,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Clone)]
pub struct StudyGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for StudyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyGenerator").finish_non_exhaustive()
    }
}

impl StudyGenerator {
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    async fn raw(&self, what: &str, prompt: &str, config: &GenerationConfig) -> Option<String> {
        match self.backend.generate(prompt, config).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{what} generation failed, using fallback: {e}");
                None
            },
        }
    }

    async fn generate_or<T>(
        &self,
        what: &str,
        prompt: &str,
        config: &GenerationConfig,
        fallback: fn() -> T,
    ) -> Generated<T>
    where
        T: DeserializeOwned + Validate,
    {
        let Some(text) = self.raw(what, prompt, config).await else {
            return Generated::Fallback(fallback());
        };
        match parse_payload::<T>(&text) {
            Ok(value) => Generated::Fresh(value),
            Err(e) => {
                warn!(reply = truncate(&text, 200), "Unusable {what} reply, using fallback: {e}");
                Generated::Fallback(fallback())
            },
        }
    }

    /// Multiple-choice question about `word` at `level`.
    pub async fn generate_question(
        &self,
        word: &str,
        level: Level,
    ) -> Generated<MultipleChoiceQuestion> {
        let prompt = question::prompt(word, level);
        self.generate_or("question", &prompt, &GenerationConfig::QUESTION, MultipleChoiceQuestion::fallback)
            .await
    }

    /// Reading passage at `level`, optionally about `topic`.
    pub async fn generate_reading(&self, level: Level, topic: Option<&str>) -> Generated<ReadingPassage> {
        let prompt = reading::prompt(level, topic);
        self.generate_or("reading", &prompt, &GenerationConfig::READING, ReadingPassage::fallback)
            .await
    }

    /// Conversation partner reply to `message`.
    ///
    /// A reply whose JSON is broken but still carries a complete `"reply"`
    /// string keeps that string instead of falling back.
    pub async fn converse(&self, message: &str, level: Level) -> Generated<ConversationReply> {
        let prompt = conversation::prompt(message, level);
        let Some(text) = self.raw("conversation", &prompt, &GenerationConfig::CONVERSATION).await
        else {
            return Generated::Fallback(ConversationReply::fallback());
        };
        match parse_payload::<ConversationReply>(&text) {
            Ok(reply) => Generated::Fresh(reply),
            Err(e) => match salvage_string_field(&text, "reply").filter(|r| !r.trim().is_empty()) {
                Some(reply) => {
                    warn!("Recovered conversation reply from malformed JSON: {e}");
                    Generated::Fresh(ConversationReply::bare(reply))
                },
                None => {
                    warn!(reply = truncate(&text, 200), "Unusable conversation reply, using fallback: {e}");
                    Generated::Fallback(ConversationReply::fallback())
                },
            },
        }
    }
}
