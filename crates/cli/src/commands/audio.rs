use std::path::Path;

use anyhow::{Context, Result};
use kotoba_service::StudyApp;
use serde_json::json;

pub(crate) async fn run_say(app: &StudyApp, text: &str, out: &Path) -> Result<()> {
    let audio = app.pronouncer()?.pronounce(text).await?;
    std::fs::write(out, &audio).with_context(|| format!("writing {}", out.display()))?;
    let output = json!({ "text": text, "out": out.display().to_string(), "bytes": audio.len() });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) async fn run_sweep(app: &StudyApp) -> Result<()> {
    let removed = app.sweep_audio().await?;
    tracing::info!(removed, "Audio cache sweep finished");
    println!("{}", serde_json::to_string_pretty(&json!({ "removed": removed }))?);
    Ok(())
}
