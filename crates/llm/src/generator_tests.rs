//! Generator behaviour against canned model replies.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kotoba_core::Level;

use crate::{
    ConversationReply, GenerationConfig, LlmError, MultipleChoiceQuestion, ReadingPassage,
    StudyGenerator, TextGenerator,
};

/// Replays one canned reply and records the prompts it saw.
struct Canned {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for Canned {
    async fn generate(&self, prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.reply.clone().map_err(|code| LlmError::HttpStatus { code, body: String::new() })
    }
}

fn generator(reply: &str) -> (StudyGenerator, Arc<Canned>) {
    let canned = Arc::new(Canned { reply: Ok(reply.to_owned()), prompts: Mutex::new(Vec::new()) });
    (StudyGenerator::new(canned.clone()), canned)
}

fn failing(code: u16) -> StudyGenerator {
    StudyGenerator::new(Arc::new(Canned { reply: Err(code), prompts: Mutex::new(Vec::new()) }))
}

#[tokio::test]
async fn test_question_from_fenced_json() {
    let reply = "Here you go:\n```json\n{\"question\": \"「猫」の意味は？\", \"options\": [\"cat\", \"dog\", \"cow\", \"fox\"], \"correct_index\": 0, \"explanation\": \"猫 = cat\"}\n```";
    let (generator, canned) = generator(reply);

    let question = generator.generate_question("猫", Level::N5).await;

    assert!(!question.is_fallback());
    assert_eq!(question.into_inner().correct_option(), Some("cat"));
    assert!(canned.prompts.lock().unwrap()[0].contains("「猫」"));
}

#[tokio::test]
async fn test_truncated_question_falls_back_to_default() {
    let (generator, _) = generator(r#"{"question": "「猫」の意味は？", "options": ["cat", "do"#);

    let question = generator.generate_question("猫", Level::N5).await;

    assert!(question.is_fallback());
    assert_eq!(question.into_inner(), MultipleChoiceQuestion::fallback());
}

#[tokio::test]
async fn test_invalid_question_falls_back() {
    let (generator, _) = generator(
        r#"{"question": "?", "options": ["a", "b", "c", "d"], "correct_index": 9}"#,
    );
    assert!(generator.generate_question("x", Level::N1).await.is_fallback());
}

#[tokio::test]
async fn test_question_transport_failure_falls_back() {
    let question = failing(401).generate_question("猫", Level::N5).await;
    assert_eq!(question, crate::Generated::Fallback(MultipleChoiceQuestion::fallback()));
}

#[tokio::test]
async fn test_reading_with_prose_around_json() {
    let (generator, _) = generator(
        "Sure! {\"title\": \"夏祭り\", \"japanese\": \"夏祭りに行きました。\", \"english\": \"I went to a summer festival.\"} Enjoy.",
    );
    let passage = generator.generate_reading(Level::N4, Some("festivals")).await.into_inner();
    assert_eq!(passage.title, "夏祭り");
    assert!(passage.vocabulary.is_empty());
}

#[tokio::test]
async fn test_reading_without_json_falls_back() {
    let (generator, _) = generator("I cannot help with that.");
    assert_eq!(generator.generate_reading(Level::N5, None).await.into_inner(), ReadingPassage::fallback());
}

#[tokio::test]
async fn test_conversation_salvages_reply_field() {
    let (generator, _) = generator(r#"{"reply": "いいですね！", "translation": "That sounds go"#);

    let reply = generator.converse("週末に山に行きます", Level::N5).await;

    assert!(!reply.is_fallback());
    assert_eq!(reply.into_inner(), ConversationReply::bare("いいですね！".to_owned()));
}

#[tokio::test]
async fn test_conversation_empty_reply_falls_back() {
    let (generator, _) = generator("");
    assert!(generator.converse("こんにちは", Level::N5).await.is_fallback());
}

#[tokio::test]
async fn test_conversation_server_error_falls_back() {
    let reply = failing(503).converse("こんにちは", Level::N5).await;
    assert_eq!(reply.into_inner(), ConversationReply::fallback());
}
