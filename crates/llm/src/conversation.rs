use kotoba_core::{Level, Validate};
use serde::{Deserialize, Serialize};

/// One turn from the conversation partner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationReply {
    /// Reply in Japanese.
    pub reply: String,
    #[serde(default)]
    pub translation: Option<String>,
    /// Correction of the learner's message, if it had mistakes.
    #[serde(default)]
    pub correction: Option<String>,
}

impl ConversationReply {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            reply: "すみません、もう一度お願いします。".to_owned(),
            translation: Some("Sorry, could you say that again?".to_owned()),
            correction: None,
        }
    }

    /// Reply carrying only the Japanese text.
    #[must_use]
    pub const fn bare(reply: String) -> Self {
        Self { reply, translation: None, correction: None }
    }
}

impl Validate for ConversationReply {
    fn validate(&self) -> Result<(), String> {
        if self.reply.trim().is_empty() {
            return Err("reply is empty".to_owned());
        }
        Ok(())
    }
}

pub(crate) fn prompt(message: &str, level: Level) -> String {
    format!(
        r#"You are a friendly Japanese conversation partner for a JLPT {level} learner.
Answer the learner's message naturally, using only {level}-level words and grammar.
If the message has mistakes, give a corrected version.

Learner: {message}

Return only JSON: {{"reply": "...", "translation": "...", "correction": null or "..."}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_valid() {
        assert!(ConversationReply::fallback().validate().is_ok());
    }

    #[test]
    fn test_blank_reply_rejected() {
        assert!(ConversationReply::bare(" ".to_owned()).validate().is_err());
    }
}
