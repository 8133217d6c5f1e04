//! Pronouncer tests against a mock speech endpoint.

use std::sync::Arc;
use std::time::Duration;

use kotoba_storage::{AudioCache, ManualClock};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{LlmError, Pronouncer, SpeechClient};

const TTL: Duration = Duration::from_secs(3600);

fn pronouncer(server: &MockServer, clock: Arc<ManualClock>) -> Pronouncer {
    let speech =
        SpeechClient::new(&server.uri(), Some("speech-key".to_owned()), "ja-JP-Test".to_owned())
            .unwrap();
    let cache = Arc::new(AudioCache::open_in_memory(TTL, clock).unwrap());
    Pronouncer::new(speech, cache)
}

#[tokio::test]
async fn test_synthesizes_once_then_serves_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech"))
        .and(header("Authorization", "Bearer speech-key"))
        .and(body_json(serde_json::json!({"text": "おはよう", "voice": "ja-JP-Test"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3, 4]))
        .expect(1)
        .mount(&server)
        .await;
    let pronouncer = pronouncer(&server, Arc::new(ManualClock::default()));

    assert_eq!(pronouncer.pronounce("おはよう").await.unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(pronouncer.pronounce("おはよう").await.unwrap(), vec![1, 2, 3, 4]);
    assert!(pronouncer.cache().has("おはよう"));
}

#[tokio::test]
async fn test_expired_audio_is_resynthesized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3".to_vec()))
        .expect(2)
        .mount(&server)
        .await;
    let clock = Arc::new(ManualClock::default());
    let pronouncer = pronouncer(&server, clock.clone());

    pronouncer.pronounce("さようなら").await.unwrap();
    clock.advance(TTL + Duration::from_secs(1));
    pronouncer.pronounce("さようなら").await.unwrap();
}

#[tokio::test]
async fn test_failure_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/speech"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine down"))
        .expect(1)
        .mount(&server)
        .await;
    let pronouncer = pronouncer(&server, Arc::new(ManualClock::default()));

    let err = pronouncer.pronounce("ありがとう").await.unwrap_err();

    assert!(matches!(err, LlmError::HttpStatus { code: 500, ref body } if body == "engine down"));
    assert!(!pronouncer.cache().has("ありがとう"));
}

#[tokio::test]
async fn test_empty_audio_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let pronouncer = pronouncer(&server, Arc::new(ManualClock::default()));

    assert!(matches!(pronouncer.pronounce("え").await, Err(LlmError::EmptyResponse)));
}
