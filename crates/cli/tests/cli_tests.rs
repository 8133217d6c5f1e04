use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: [&str; 10] = [
    "KOTOBA_API_URL",
    "KOTOBA_AI_URL",
    "KOTOBA_AI_KEY",
    "KOTOBA_AI_MODEL",
    "KOTOBA_SPEECH_URL",
    "KOTOBA_SPEECH_KEY",
    "KOTOBA_SPEECH_VOICE",
    "KOTOBA_LIST_CACHE_TTL_SECS",
    "KOTOBA_AUDIO_CACHE_TTL_SECS",
    "KOTOBA_AUDIO_DB",
];

/// `kotoba` with a clean environment and the audio cache inside `dir`.
fn kotoba(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kotoba").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("KOTOBA_AUDIO_DB", dir.path().join("audio.db"));
    cmd.env("KOTOBA_API_URL", "http://127.0.0.1:9/graphql");
    cmd
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Japanese study lists, quizzes and pronunciation"));
}

#[test]
fn test_cli_list_help() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--search").and(predicate::str::contains("--refresh")));
}

#[test]
fn test_cli_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .args(["list", "kanji"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid content kind"));
}

#[test]
fn test_cli_rejects_unknown_level() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .args(["quiz", "猫", "--level", "N6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid level"));
}

#[test]
fn test_cli_list_reports_fetch_failure() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .args(["list", "grammar", "--level", "n4"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\"").and(predicate::str::contains("\"items\": []")))
        .stderr(predicate::str::contains("failed to load grammar list"));
}

#[test]
fn test_cli_quiz_requires_ai_key() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .args(["quiz", "猫"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KOTOBA_AI_KEY"));
}

#[test]
fn test_cli_say_requires_speech() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.mp3");
    kotoba(&dir)
        .args(["say", "こんにちは", "--out"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("KOTOBA_SPEECH_URL"));
    assert!(!out.exists());
}

#[test]
fn test_cli_sweep_audio_on_fresh_cache() {
    let dir = TempDir::new().unwrap();
    kotoba(&dir)
        .arg("sweep-audio")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\": 0"));
    assert!(dir.path().join("audio.db").exists());
}
