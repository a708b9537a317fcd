//! `OpenAI` client tests against a local mock of the API

use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use voxchat::config::OpenAiConfig;
use voxchat::{AiClient, Error, OpenAiClient};

const API_KEY: &str = "sk-test";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer sk-test")
}

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    if body["model"] != "gpt-3.5-turbo" || messages.len() != 1 || messages[0]["role"] != "user" {
        return (StatusCode::BAD_REQUEST, format!("unexpected request: {body}")).into_response();
    }
    let prompt = messages[0]["content"].as_str().unwrap_or_default();
    if prompt == "empty" {
        return Json(json!({ "choices": [] })).into_response();
    }
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": format!("  echo: {prompt}\n") } }]
    }))
    .into_response()
}

async fn transcriptions(headers: HeaderMap, body: Bytes) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    let text = String::from_utf8_lossy(&body);
    if !is_multipart || !text.contains("whisper-1") || !text.contains("filename=\"clip.wav\"") {
        return (StatusCode::BAD_REQUEST, "unexpected upload").into_response();
    }
    if !text.contains("Content-Type: audio/wav") && !text.contains("content-type: audio/wav") {
        return (StatusCode::BAD_REQUEST, "wrong mime type").into_response();
    }
    Json(json!({ "text": "hello from the mic" })).into_response()
}

async fn speech(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["model"] != "tts-1" || body["voice"] != "nova" || body["input"] != "Say this" {
        return (StatusCode::BAD_REQUEST, format!("unexpected request: {body}")).into_response();
    }
    ([(header::CONTENT_TYPE, "audio/mpeg")], b"ID3fake-mp3".to_vec()).into_response()
}

/// Serve the mock API on an ephemeral port, returning its base URL
async fn spawn_mock_api() -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/audio/transcriptions", post(transcriptions))
        .route("/v1/audio/speech", post(speech));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn client_for(base_url: String, key: &str) -> OpenAiClient {
    let config = OpenAiConfig {
        base_url,
        ..OpenAiConfig::default()
    };
    OpenAiClient::new(SecretString::from(key.to_string()), &config).unwrap()
}

#[tokio::test]
async fn test_complete_sends_single_user_message_and_trims() {
    let client = client_for(spawn_mock_api().await, API_KEY);

    let reply = client.complete("Hello").await.unwrap();
    assert_eq!(reply, "echo: Hello");
}

#[tokio::test]
async fn test_complete_without_choices_is_error() {
    let client = client_for(spawn_mock_api().await, API_KEY);

    let err = client.complete("empty").await.unwrap_err();
    assert!(matches!(err, Error::Completion(_)));
}

#[tokio::test]
async fn test_rejected_key_surfaces_status() {
    let client = client_for(spawn_mock_api().await, "sk-wrong");

    let err = client.complete("Hello").await.unwrap_err();
    match err {
        Error::Completion(msg) => assert!(msg.contains("401"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_transcribe_uploads_file() {
    let client = client_for(spawn_mock_api().await, API_KEY);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.wav");
    std::fs::write(&path, b"RIFF\x24\x00\x00\x00WAVEfmt ").unwrap();

    let text = client.transcribe(&path).await.unwrap();
    assert_eq!(text, "hello from the mic");
}

#[tokio::test]
async fn test_transcribe_missing_file_is_io_error() {
    let client = client_for(spawn_mock_api().await, API_KEY);
    let dir = tempfile::tempdir().unwrap();

    let err = client.transcribe(&dir.path().join("absent.wav")).await.unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn test_synthesize_streams_to_file() {
    let client = client_for(spawn_mock_api().await, API_KEY);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("reply.mp3");

    client.synthesize("Say this", &dest).await.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"ID3fake-mp3");
}

#[tokio::test]
async fn test_synthesize_error_status() {
    let client = client_for(spawn_mock_api().await, API_KEY);
    let dir = tempfile::tempdir().unwrap();

    let err = client
        .synthesize("something else", &dir.path().join("reply.mp3"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Tts(_)));
}

#[test]
fn test_empty_key_rejected() {
    let result = OpenAiClient::new(SecretString::from(String::new()), &OpenAiConfig::default());
    assert!(matches!(result, Err(Error::MissingCredential)));
}
