use kotoba_core::{Level, Validate, VocabularyWord};
use serde::{Deserialize, Serialize};

/// Short generated reading passage with its translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingPassage {
    pub title: String,
    pub japanese: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyWord>,
}

impl ReadingPassage {
    /// Passage served whenever generation fails: a self-introduction.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            title: "自己紹介".to_owned(),
            japanese: "はじめまして。わたしはたなかです。がくせいです。どうぞよろしく。".to_owned(),
            english: "Nice to meet you. I am Tanaka. I am a student. Pleased to meet you."
                .to_owned(),
            vocabulary: vec![VocabularyWord {
                japanese: "学生".to_owned(),
                reading: Some("がくせい".to_owned()),
                meaning: "student".to_owned(),
            }],
        }
    }
}

impl Validate for ReadingPassage {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_owned());
        }
        if self.japanese.trim().is_empty() {
            return Err("passage is empty".to_owned());
        }
        if self.vocabulary.iter().any(|w| w.japanese.trim().is_empty()) {
            return Err("vocabulary entry without Japanese".to_owned());
        }
        Ok(())
    }
}

pub(crate) fn prompt(level: Level, topic: Option<&str>) -> String {
    let topic = topic.map_or_else(|| "everyday life".to_owned(), str::to_owned);
    format!(
        r#"Write a short Japanese reading passage (4-8 sentences) for JLPT {level} learners about: {topic}.

Return only JSON with these fields:
- title: Japanese title
- japanese: the passage
- english: a natural English translation
- vocabulary: array of {{"japanese", "reading", "meaning"}} for 3-5 key words"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_valid() {
        assert!(ReadingPassage::fallback().validate().is_ok());
    }

    #[test]
    fn test_blank_passage_rejected() {
        let passage = ReadingPassage { japanese: "  ".to_owned(), ..ReadingPassage::fallback() };
        assert_eq!(passage.validate().unwrap_err(), "passage is empty");
    }

    #[test]
    fn test_prompt_defaults_topic() {
        assert!(prompt(Level::N5, None).contains("everyday life"));
        assert!(prompt(Level::N3, Some("festivals")).contains("festivals"));
    }
}
