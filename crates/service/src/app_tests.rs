use std::time::Duration;

use kotoba_core::{AppConfig, ContentKind, SpeechConfig};
use tempfile::TempDir;

use crate::fake_gateway::{grammar_list, FakeGateway, Reply};
use crate::{ServiceError, StudyApp};

fn config(dir: &TempDir) -> AppConfig {
    AppConfig {
        api_url: "http://127.0.0.1:9/graphql".to_owned(),
        ai: None,
        speech: None,
        list_cache_ttl: Duration::from_secs(300),
        audio_cache_ttl: Duration::from_secs(3600),
        audio_db_path: dir.path().join("audio.db"),
    }
}

#[tokio::test]
async fn test_controllers_share_one_list_cache() {
    let dir = TempDir::new().unwrap();
    let fake = FakeGateway::scripted([Reply::items(grammar_list(4))]);
    let app = StudyApp::with_gateway(config(&dir), fake.clone()).unwrap();

    let first = app.controller(ContentKind::Grammar).load().await;
    let second = app.controller(ContentKind::Grammar).load().await;

    assert_eq!(first.page, second.page);
    assert_eq!(fake.call_count(), 1);
    assert_eq!(app.gateway().cache().len(), 1);
}

#[tokio::test]
async fn test_kinds_are_cached_separately() {
    let dir = TempDir::new().unwrap();
    let fake = FakeGateway::scripted([Reply::items(grammar_list(4)), Reply::items(grammar_list(1))]);
    let app = StudyApp::with_gateway(config(&dir), fake.clone()).unwrap();

    app.controller(ContentKind::Grammar).load().await;
    let readings = app.controller(ContentKind::Reading).load().await;

    assert_eq!(readings.page.total_count, 1);
    assert_eq!(fake.call_count(), 2);
}

#[test]
fn test_optional_backends_report_not_configured() {
    let dir = TempDir::new().unwrap();
    let app = StudyApp::with_gateway(config(&dir), FakeGateway::default()).unwrap();

    assert!(matches!(app.generator(), Err(ServiceError::NotConfigured(_))));
    assert!(matches!(app.pronouncer(), Err(ServiceError::NotConfigured(_))));
    assert!(app.spawn_audio_sweep().is_none());
}

#[tokio::test]
async fn test_speech_config_enables_pronouncer_and_sweep() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.speech = Some(SpeechConfig {
        base_url: "http://127.0.0.1:9".to_owned(),
        api_key: None,
        voice: "ja-JP-Test".to_owned(),
    });
    let app = StudyApp::with_gateway(config, FakeGateway::default()).unwrap();

    assert!(app.pronouncer().is_ok());
    assert!(dir.path().join("audio.db").exists());
    assert_eq!(app.sweep_audio().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sweep_without_speech_opens_cache_on_demand() {
    let dir = TempDir::new().unwrap();
    let app = StudyApp::with_gateway(config(&dir), FakeGateway::default()).unwrap();

    assert_eq!(app.sweep_audio().await.unwrap(), 0);
    assert!(dir.path().join("audio.db").exists());
}

#[tokio::test]
async fn test_pending_audio_sweep_removes_expired_rows_when_finished() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.audio_cache_ttl = Duration::from_millis(1);
    config.speech = Some(SpeechConfig {
        base_url: "http://127.0.0.1:9".to_owned(),
        api_key: None,
        voice: "ja-JP-Test".to_owned(),
    });
    let app = StudyApp::with_gateway(config, FakeGateway::default()).unwrap();
    let cache = app.pronouncer().unwrap().cache();
    cache.set("猫", b"meow");
    tokio::time::sleep(Duration::from_millis(20)).await;

    let sweep = app.spawn_audio_sweep().unwrap();
    let removed = tokio::time::timeout(Duration::from_secs(1), sweep.finish()).await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(cache.persisted_len().unwrap(), 0);
}
