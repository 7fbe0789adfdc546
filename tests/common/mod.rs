#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use vidsum::{app, config::settings::Settings, AppState};

pub const VALID_VIDEO_ID: &str = "dQw4w9WgXcQ";
pub const NO_CAPTIONS_VIDEO_ID: &str = "noCaptions1";
/// The mock answers requests for this id with the info of [`VALID_VIDEO_ID`].
pub const MISMATCHED_VIDEO_ID: &str = "mismatched1";
pub const SESSION_TOKEN: &str = "session-token";
pub const API_KEY: &str = "test-key";
pub const MOCK_SUMMARY: &str = "This is a mock summary.";
pub const MOCK_AUDIO: &[u8] = &[0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00];

#[derive(Clone)]
pub enum ChatReply {
    Content(&'static str),
    NoChoices,
    NullContent,
    Error(StatusCode, &'static str),
}

#[derive(Clone)]
pub enum SpeechReply {
    Audio(&'static [u8]),
    Error(StatusCode, &'static str),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: &'static str,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Stand-in for the transcript, chat-completion and speech providers.
#[derive(Clone)]
pub struct MockProvider {
    pub chat: ChatReply,
    pub speech: SpeechReply,
    pub auth_ok: bool,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            chat: ChatReply::Content(MOCK_SUMMARY),
            speech: SpeechReply::Audio(MOCK_AUDIO),
            auth_ok: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockProvider {
    pub fn with_chat(chat: ChatReply) -> Self {
        Self { chat, ..Self::default() }
    }

    pub fn with_speech(speech: SpeechReply) -> Self {
        Self { speech, ..Self::default() }
    }

    pub fn with_failing_auth() -> Self {
        Self { auth_ok: false, ..Self::default() }
    }

    fn record(&self, path: &'static str, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { path, authorization, body });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    /// Serves the mock on an ephemeral local port and returns its base URL.
    pub async fn start(&self) -> String {
        let router = Router::new()
            .route("/auth/signup", post(sign_up))
            .route("/api/transcripts", post(transcripts))
            .route("/v1/chat/completions", post(chat_completions))
            .route("/v1/audio/speech", post(speech))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

pub fn mock_video() -> Value {
    json!({
        "id": VALID_VIDEO_ID,
        "tracks": [{
            "language": "English",
            "transcript": [
                { "text": "Hello", "start": "0.0", "dur": "1.0" },
                { "text": "world", "start": "1.0", "dur": "1.0" }
            ]
        }],
        "title": "Mock Video Title",
        "isLive": false,
        "isLoginRequired": false,
        "microformat": {
            "playerMicroformatRenderer": {
                "ownerChannelName": "Mock Channel",
                "lengthSeconds": 120,
                "publishDate": "2023-01-01",
                "externalChannelId": "mockChannelId"
            }
        }
    })
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

async fn sign_up(State(mock): State<MockProvider>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("/auth/signup", &headers, body.clone());

    if !mock.auth_ok {
        return error_body(StatusCode::SERVICE_UNAVAILABLE, "auth service down");
    }
    if body["returnSecureToken"] != json!(true) {
        return error_body(StatusCode::BAD_REQUEST, "returnSecureToken required");
    }

    Json(json!({ "idToken": SESSION_TOKEN, "expiresIn": "3600" })).into_response()
}

async fn transcripts(State(mock): State<MockProvider>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("/api/transcripts", &headers, body.clone());

    let expected = format!("Bearer {}", SESSION_TOKEN);
    if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return error_body(StatusCode::UNAUTHORIZED, "missing session");
    }

    match body["ids"][0].as_str() {
        Some(VALID_VIDEO_ID) | Some(MISMATCHED_VIDEO_ID) => Json(json!([mock_video()])).into_response(),
        Some(NO_CAPTIONS_VIDEO_ID) => Json(json!([{
            "id": NO_CAPTIONS_VIDEO_ID,
            "title": "Silent Film",
            "tracks": [],
            "playabilityStatus": { "status": "OK", "reason": "Transcripts are disabled for this video" }
        }]))
        .into_response(),
        _ => error_body(StatusCode::NOT_FOUND, "Invalid video ID"),
    }
}

async fn chat_completions(State(mock): State<MockProvider>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("/v1/chat/completions", &headers, body);

    match mock.chat {
        ChatReply::Content(content) => Json(json!({
            "id": "chatcmpl-mock",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }],
            "usage": { "prompt_tokens": 20, "completion_tokens": 6, "total_tokens": 26 }
        }))
        .into_response(),
        ChatReply::NoChoices => Json(json!({ "id": "chatcmpl-mock", "choices": [] })).into_response(),
        ChatReply::NullContent => Json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }]
        }))
        .into_response(),
        ChatReply::Error(status, body) => (status, body).into_response(),
    }
}

async fn speech(State(mock): State<MockProvider>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    mock.record("/v1/audio/speech", &headers, body);

    match mock.speech {
        SpeechReply::Audio(bytes) => Response::builder()
            .header(header::CONTENT_TYPE, "audio/mpeg")
            .body(Body::from(bytes))
            .unwrap(),
        SpeechReply::Error(status, body) => (status, body).into_response(),
    }
}

/// Settings pointing every provider at `base_url`.
pub fn settings_for(base_url: &str) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("OPENAI_API_KEY", API_KEY.to_string()),
        ("OPENAI_BASE_URL", format!("{}/v1", base_url)),
        ("TRANSCRIPT_BASE_URL", format!("{}/api", base_url)),
        ("TRANSCRIPT_AUTH_URL", format!("{}/auth/signup", base_url)),
    ]);

    Settings::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub async fn setup_test_server(mock: &MockProvider) -> TestServer {
    let base_url = mock.start().await;
    test_server_with(settings_for(&base_url))
}

pub fn test_server_with(settings: Settings) -> TestServer {
    TestServer::new(app(AppState::new(settings))).unwrap()
}
