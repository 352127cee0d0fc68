use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use tts_api_server::api::routes::{create_router, AppState};
use tts_api_server::store::JobStore;
use tts_api_server::tts::{SynthesisError, SynthesisRequest, Synthesizer};

const STUB_AUDIO: &[u8] = b"\xff\xfb\x90stub-mpeg-frame";

/// Engine double with the same failure surface as the real client: empty
/// text and unknown language codes fail, everything else yields fixed bytes.
struct StubSynthesizer;

#[async_trait]
impl Synthesizer for StubSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        if request.text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        if !tts_api_server::tts::gtts::is_supported_language(&request.language) {
            return Err(SynthesisError::UnsupportedLanguage(request.language.clone()));
        }
        Ok(STUB_AUDIO.to_vec())
    }
}

struct TestApp {
    router: Router,
    audio_dir: std::path::PathBuf,
    // Keeps the database and audio files alive for the test's duration.
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("jobs.db").display());
    let store = JobStore::connect(&db_url).await.expect("connect store");
    let audio_dir = dir.path().join("audio");
    std::fs::create_dir_all(&audio_dir).expect("audio dir");

    let state = Arc::new(AppState {
        synthesizer: Arc::new(StubSynthesizer),
        store,
        audio_dir: audio_dir.clone(),
        public_base_url: "http://localhost:3000".to_string(),
    });

    TestApp {
        router: create_router(state),
        audio_dir,
        _dir: dir,
    }
}

fn convert_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn convert_returns_completed_with_retrievable_url() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(convert_request(serde_json::json!({"text": "hello world"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["message"], "Text-to-speech conversion successful.");
    let url = body["audio_file_url"].as_str().unwrap();
    assert!(!url.is_empty());

    // The identifier embedded in the URL resolves through the retrieval
    // endpoint and serves back the synthesized bytes.
    let file_id = url.rsplit('/').next().unwrap();
    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/audio/{}", file_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "audio/mpeg"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename={}.mp3", file_id)
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], STUB_AUDIO);
}

#[tokio::test]
async fn convert_applies_documented_defaults() {
    let app = test_app().await;

    // Only `text` given; language defaults to "en", the inert voice
    // parameters to their documented values.
    let response = app
        .router
        .clone()
        .oneshot(convert_request(serde_json::json!({"text": "defaults"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "COMPLETED");
}

#[tokio::test]
async fn convert_with_invalid_language_reports_failed() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(convert_request(serde_json::json!({
            "text": "hello",
            "language": "xx-INVALID"
        })))
        .await
        .unwrap();
    // Synthesis failure is not an HTTP failure.
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["audio_file_url"], "");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("An error occurred during conversion:"));
    assert!(message.contains("xx-INVALID"));
}

#[tokio::test]
async fn convert_with_empty_text_reports_failed() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(convert_request(serde_json::json!({"text": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "FAILED");
    assert_eq!(body["audio_file_url"], "");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_converts_yield_unique_identifiers() {
    let app = test_app().await;

    let mut urls = Vec::new();
    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(convert_request(serde_json::json!({"text": "again"})))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "COMPLETED");
        urls.push(body["audio_file_url"].as_str().unwrap().to_string());
    }
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 3);
}

#[tokio::test]
async fn retrieve_unknown_id_is_404_not_found() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/audio/never-seen"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["code"], "FILE_NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("never-seen"));
}

#[tokio::test]
async fn retrieve_with_externally_deleted_file_is_distinct_404() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(convert_request(serde_json::json!({"text": "doomed"})))
        .await
        .unwrap();
    let body = json_body(response).await;
    let file_id = body["audio_file_url"]
        .as_str()
        .unwrap()
        .rsplit('/')
        .next()
        .unwrap()
        .to_string();

    // Simulate external deletion of the backing file.
    std::fs::remove_file(app.audio_dir.join(format!("{}.mp3", file_id))).unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/audio/{}", file_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["code"], "AUDIO_FILE_MISSING");
    assert!(body["error"].as_str().unwrap().contains("missing from storage"));
}

#[tokio::test]
async fn status_reports_operational_with_rfc3339_timestamp() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "Operational");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}
