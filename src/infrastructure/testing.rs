//! Test doubles: a local stub upstream and in-memory LLM/Bot fakes

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::application::errors::BotError;
use crate::domain::entities::ChatId;
use crate::domain::traits::Bot;
use crate::infrastructure::llm::{LLMError, LLMMessage, LLMResponse, LLMResult, LLM};

/// A request the stub received
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Running stub server; answers every request with the same canned response
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub async fn json(status: u16, body: serde_json::Value) -> Self {
        Self::spawn(status, body.to_string(), Duration::ZERO).await
    }

    pub async fn raw(status: u16, body: &str) -> Self {
        Self::spawn(status, body.to_string(), Duration::ZERO).await
    }

    pub async fn slow(delay: Duration, body: serde_json::Value) -> Self {
        Self::spawn(200, body.to_string(), delay).await
    }

    async fn spawn(status: u16, body: String, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status).expect("valid status"),
            body,
            delay,
            requests: requests.clone(),
        };

        let app = Router::new().fallback(capture).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("stub lock").clone()
    }
}

async fn capture(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let captured = CapturedRequest {
        path: uri.path().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    };
    state.requests.lock().expect("stub lock").push(captured);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [("content-type", "application/json")],
        state.body.clone(),
    )
        .into_response()
}

/// In-memory LLM that records prompts and replays a canned answer
pub struct FakeLLM {
    reply: Result<String, String>,
    calls: Mutex<Vec<Vec<LLMMessage>>>,
}

impl FakeLLM {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<LLMMessage>> {
        self.calls.lock().expect("fake lock").clone()
    }
}

#[async_trait]
impl LLM for FakeLLM {
    fn name(&self) -> &str {
        "fake"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        _temperature: Option<f32>,
        _max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        self.calls.lock().expect("fake lock").push(messages);
        match &self.reply {
            Ok(content) => Ok(LLMResponse {
                content: content.clone(),
                model: model.unwrap_or("fake-model").to_string(),
                usage: None,
                finish_reason: Some("stop".to_string()),
            }),
            Err(reason) => Err(LLMError::ApiError(reason.clone())),
        }
    }
}

/// In-memory bot that records deliveries
pub struct FakeBot {
    max_len: usize,
    fail: bool,
    sent: Mutex<Vec<(ChatId, String)>>,
}

impl FakeBot {
    pub fn new() -> Self {
        Self {
            max_len: 4096,
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().expect("fake lock").clone()
    }
}

#[async_trait]
impl Bot for FakeBot {
    fn platform(&self) -> &str {
        "fake"
    }

    fn max_message_length(&self) -> usize {
        self.max_len
    }

    async fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
    ) -> Result<String, BotError> {
        self.sent
            .lock()
            .expect("fake lock")
            .push((chat_id.clone(), text.to_string()));
        if self.fail {
            return Err(BotError::Network("connection refused".into()));
        }
        Ok("1".to_string())
    }
}
