//! Multiple-choice quiz questions.

use std::collections::HashSet;

use kotoba_core::{Level, Validate};
use serde::{Deserialize, Serialize};

/// Number of answer options a generated question must have.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultipleChoiceQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl MultipleChoiceQuestion {
    /// Question served whenever generation fails.
    ///
    /// Asks for the reading of 水 with four kana options; the first is correct.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            question: "「水」の読み方はどれですか？".to_owned(),
            options: ["みず", "ひ", "き", "つち"].map(str::to_owned).to_vec(),
            correct_index: 0,
            explanation: "水 is read みず and means \"water\".".to_owned(),
        }
    }

    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }
}

impl Validate for MultipleChoiceQuestion {
    fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question is empty".to_owned());
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!("expected {OPTION_COUNT} options, got {}", self.options.len()));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err("blank option".to_owned());
        }
        let distinct: HashSet<&str> = self.options.iter().map(|o| o.trim()).collect();
        if distinct.len() != self.options.len() {
            return Err("duplicate options".to_owned());
        }
        if self.correct_index >= self.options.len() {
            return Err(format!("correct_index {} out of range", self.correct_index));
        }
        Ok(())
    }
}

pub(crate) fn prompt(word: &str, level: Level) -> String {
    format!(
        r#"You write Japanese vocabulary quizzes for JLPT {level} learners.

Create one multiple-choice question that tests the word 「{word}」.
Use vocabulary and grammar appropriate for {level}.

Return only JSON with these fields:
- question: the question text in Japanese
- options: exactly {OPTION_COUNT} distinct answer strings
- correct_index: 0-based index of the correct option
- explanation: one short English sentence explaining the answer"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> MultipleChoiceQuestion {
        MultipleChoiceQuestion {
            question: "「犬」の意味は？".to_owned(),
            options: ["dog", "cat", "bird", "fish"].map(str::to_owned).to_vec(),
            correct_index: 0,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_fallback_is_valid() {
        let q = MultipleChoiceQuestion::fallback();
        assert!(q.validate().is_ok());
        assert_eq!(q.correct_option(), Some("みず"));
    }

    #[test]
    fn test_out_of_range_answer_rejected() {
        let q = MultipleChoiceQuestion { correct_index: 4, ..valid() };
        assert!(q.validate().unwrap_err().contains("out of range"));
    }

    #[test]
    fn test_duplicate_options_rejected() {
        let mut q = valid();
        q.options[3] = " dog".to_owned();
        assert_eq!(q.validate().unwrap_err(), "duplicate options");
    }

    #[test]
    fn test_wrong_option_count_rejected() {
        let mut q = valid();
        q.options.pop();
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_prompt_mentions_word_and_level() {
        let p = prompt("食べる", Level::N4);
        assert!(p.contains("「食べる」"));
        assert!(p.contains("JLPT N4"));
    }
}
