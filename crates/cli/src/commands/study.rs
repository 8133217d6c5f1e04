use anyhow::Result;
use kotoba_core::Level;
use kotoba_llm::Generated;
use kotoba_service::StudyApp;
use serde::Serialize;
use serde_json::json;

fn print_generated<T: Serialize>(generated: Generated<T>) -> Result<()> {
    let fallback = generated.is_fallback();
    let output = json!({ "fallback": fallback, "content": generated.into_inner() });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) async fn run_quiz(app: &StudyApp, word: &str, level: Level) -> Result<()> {
    print_generated(app.generator()?.generate_question(word, level).await)
}

pub(crate) async fn run_read(app: &StudyApp, level: Level, topic: Option<&str>) -> Result<()> {
    print_generated(app.generator()?.generate_reading(level, topic).await)
}

pub(crate) async fn run_chat(app: &StudyApp, message: &str, level: Level) -> Result<()> {
    print_generated(app.generator()?.converse(message, level).await)
}
