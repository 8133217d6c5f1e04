//! Study content records shared by every list view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONVERSATION_PAGE_SIZE, GRAMMAR_PAGE_SIZE, QUESTION_PAGE_SIZE, READING_PAGE_SIZE,
    VOCABULARY_PAGE_SIZE,
};
use crate::error::CoreError;
use crate::level::Level;
use crate::listing::Listable;

/// Kind of content a list view shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    VocabularyCategory,
    Grammar,
    Conversation,
    Question,
    Reading,
}

impl ContentKind {
    pub const ALL: [Self; 5] = [
        Self::VocabularyCategory,
        Self::Grammar,
        Self::Conversation,
        Self::Question,
        Self::Reading,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VocabularyCategory => "vocabulary",
            Self::Grammar => "grammar",
            Self::Conversation => "conversation",
            Self::Question => "question",
            Self::Reading => "reading",
        }
    }

    /// Page size of this kind's list view.
    #[must_use]
    pub const fn page_size(self) -> usize {
        match self {
            Self::VocabularyCategory => VOCABULARY_PAGE_SIZE,
            Self::Grammar => GRAMMAR_PAGE_SIZE,
            Self::Conversation => CONVERSATION_PAGE_SIZE,
            Self::Question => QUESTION_PAGE_SIZE,
            Self::Reading => READING_PAGE_SIZE,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vocabulary" | "vocabulary_category" | "category" | "categories" => {
                Ok(Self::VocabularyCategory)
            },
            "grammar" => Ok(Self::Grammar),
            "conversation" | "conversations" => Ok(Self::Conversation),
            "question" | "questions" | "exercise" | "exercises" => Ok(Self::Question),
            "reading" | "readings" => Ok(Self::Reading),
            other => Err(CoreError::InvalidContentKind(other.to_owned())),
        }
    }
}

/// Item identifier. The backend uses integers for some kinds and slugs for others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyWord {
    pub japanese: String,
    #[serde(default)]
    pub reading: Option<String>,
    pub meaning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageExample {
    pub japanese: String,
    pub english: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub japanese: String,
    #[serde(default)]
    pub english: Option<String>,
}

/// Kind-specific fields of a [`ContentItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentPayload {
    VocabularyCategory {
        #[serde(default)]
        words: Vec<VocabularyWord>,
    },
    Grammar {
        pattern: String,
        meaning: String,
        #[serde(default)]
        examples: Vec<UsageExample>,
    },
    Conversation {
        scenario: String,
        #[serde(default)]
        lines: Vec<DialogueLine>,
    },
    Question {
        prompt: String,
        options: Vec<String>,
        answer_index: usize,
        #[serde(default)]
        explanation: Option<String>,
    },
    Reading {
        passage: String,
        #[serde(default)]
        translation: Option<String>,
    },
}

impl ContentPayload {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::VocabularyCategory { .. } => ContentKind::VocabularyCategory,
            Self::Grammar { .. } => ContentKind::Grammar,
            Self::Conversation { .. } => ContentKind::Conversation,
            Self::Question { .. } => ContentKind::Question,
            Self::Reading { .. } => ContentKind::Reading,
        }
    }
}

/// A category, grammar point, conversation, question or reading passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(flatten)]
    pub payload: ContentPayload,
}

impl ContentItem {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.payload.kind()
    }
}

impl Listable for ContentItem {
    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        match &self.payload {
            ContentPayload::Grammar { meaning, .. } => fields.push(meaning),
            ContentPayload::Conversation { scenario, .. } => fields.push(scenario),
            ContentPayload::VocabularyCategory { .. }
            | ContentPayload::Question { .. }
            | ContentPayload::Reading { .. } => {},
        }
        fields
    }

    fn level(&self) -> Option<Level> {
        self.level
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn id(&self) -> &ItemId {
        &self.id
    }
}
