//! Query documents and wire shapes for each content kind.
//!
//! The backend speaks camelCase and uses a slightly different field set per
//! kind; everything is mapped into [`ContentItem`] here so nothing above the
//! gateway sees wire types.

use kotoba_core::{
    ContentItem, ContentKind, ContentPayload, DialogueLine, ItemId, Level, PagedResult,
    UsageExample, VocabularyWord,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::FetchFailure;

const LIST_ARGS: &str = "$page: Int!, $pageSize: Int!, $search: String, $sortField: String, \
                         $sortDirection: SortDirection, $filters: JSON";
const LIST_VARS: &str = "page: $page, pageSize: $pageSize, search: $search, \
                         sortField: $sortField, sortDirection: $sortDirection, filters: $filters";

/// Root field of the list query for `kind`.
#[must_use]
pub const fn root_field(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::VocabularyCategory => "vocabularyCategories",
        ContentKind::Grammar => "grammarPoints",
        ContentKind::Conversation => "conversations",
        ContentKind::Question => "questions",
        ContentKind::Reading => "readings",
    }
}

const fn selection(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::VocabularyCategory => {
            "id name description level words { japanese reading english }"
        },
        ContentKind::Grammar => {
            "id title description level pattern meaning examples { japanese english }"
        },
        ContentKind::Conversation => {
            "id title description level scenario lines { speaker japanese english }"
        },
        ContentKind::Question => "id question options correctIndex explanation level",
        ContentKind::Reading => "id title description level passage translation",
    }
}

/// Full GraphQL document for one page of `kind`.
#[must_use]
pub fn document(kind: ContentKind) -> String {
    let field = root_field(kind);
    format!(
        "query List({LIST_ARGS}) {{ {field}({LIST_VARS}) {{ items {{ {} }} totalCount totalPages page }} }}",
        selection(kind)
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePage<T> {
    items: Vec<T>,
    total_count: usize,
    total_pages: usize,
    page: usize,
}

#[derive(Deserialize)]
struct WireWord {
    japanese: String,
    #[serde(default)]
    reading: Option<String>,
    english: String,
}

#[derive(Deserialize)]
struct WireVocabularyCategory {
    id: ItemId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    words: Vec<WireWord>,
}

#[derive(Deserialize)]
struct WireGrammarPoint {
    id: ItemId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    level: Option<String>,
    pattern: String,
    meaning: String,
    #[serde(default)]
    examples: Vec<UsageExample>,
}

#[derive(Deserialize)]
struct WireConversation {
    id: ItemId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    level: Option<String>,
    scenario: String,
    #[serde(default)]
    lines: Vec<DialogueLine>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    id: ItemId,
    question: String,
    options: Vec<String>,
    correct_index: usize,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    level: Option<String>,
}

#[derive(Deserialize)]
struct WireReading {
    id: ItemId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    level: Option<String>,
    passage: String,
    #[serde(default)]
    translation: Option<String>,
}

/// Unknown level strings are logged and treated as "no level".
fn parse_level(raw: Option<String>, id: &ItemId) -> Option<Level> {
    let raw = raw?;
    match raw.parse() {
        Ok(level) => Some(level),
        Err(e) => {
            warn!(item = %id, "Ignoring level on item: {e}");
            None
        },
    }
}

impl From<WireVocabularyCategory> for ContentItem {
    fn from(w: WireVocabularyCategory) -> Self {
        let level = parse_level(w.level, &w.id);
        let words = w
            .words
            .into_iter()
            .map(|word| VocabularyWord {
                japanese: word.japanese,
                reading: word.reading,
                meaning: word.english,
            })
            .collect();
        Self {
            id: w.id,
            title: w.name,
            description: w.description,
            level,
            payload: ContentPayload::VocabularyCategory { words },
        }
    }
}

impl From<WireGrammarPoint> for ContentItem {
    fn from(w: WireGrammarPoint) -> Self {
        let level = parse_level(w.level, &w.id);
        Self {
            id: w.id,
            title: w.title,
            description: w.description,
            level,
            payload: ContentPayload::Grammar {
                pattern: w.pattern,
                meaning: w.meaning,
                examples: w.examples,
            },
        }
    }
}

impl From<WireConversation> for ContentItem {
    fn from(w: WireConversation) -> Self {
        let level = parse_level(w.level, &w.id);
        Self {
            id: w.id,
            title: w.title,
            description: w.description,
            level,
            payload: ContentPayload::Conversation { scenario: w.scenario, lines: w.lines },
        }
    }
}

impl From<WireQuestion> for ContentItem {
    fn from(w: WireQuestion) -> Self {
        let level = parse_level(w.level, &w.id);
        Self {
            id: w.id,
            title: w.question.clone(),
            description: None,
            level,
            payload: ContentPayload::Question {
                prompt: w.question,
                options: w.options,
                answer_index: w.correct_index,
                explanation: w.explanation,
            },
        }
    }
}

impl From<WireReading> for ContentItem {
    fn from(w: WireReading) -> Self {
        let level = parse_level(w.level, &w.id);
        Self {
            id: w.id,
            title: w.title,
            description: w.description,
            level,
            payload: ContentPayload::Reading { passage: w.passage, translation: w.translation },
        }
    }
}

fn convert<W>(root: Value, page_size: usize) -> Result<PagedResult<ContentItem>, FetchFailure>
where
    W: DeserializeOwned + Into<ContentItem>,
{
    let wire: WirePage<W> =
        serde_json::from_value(root).map_err(|e| FetchFailure::Malformed(e.to_string()))?;
    Ok(PagedResult {
        items: wire.items.into_iter().map(Into::into).collect(),
        total_count: wire.total_count,
        total_pages: wire.total_pages,
        page: wire.page,
        page_size,
    })
}

/// Pull `kind`'s root field out of `data` and map it into a page.
///
/// # Errors
/// [`FetchFailure::Malformed`] when the root field or any required item field is missing.
pub fn decode_page(
    kind: ContentKind,
    mut data: serde_json::Map<String, Value>,
    page_size: usize,
) -> Result<PagedResult<ContentItem>, FetchFailure> {
    let field = root_field(kind);
    let root = data
        .remove(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| FetchFailure::Malformed(format!("missing `{field}`")))?;
    match kind {
        ContentKind::VocabularyCategory => convert::<WireVocabularyCategory>(root, page_size),
        ContentKind::Grammar => convert::<WireGrammarPoint>(root, page_size),
        ContentKind::Conversation => convert::<WireConversation>(root, page_size),
        ContentKind::Question => convert::<WireQuestion>(root, page_size),
        ContentKind::Reading => convert::<WireReading>(root, page_size),
    }
}
