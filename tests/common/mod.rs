//! Shared helpers: stub upstreams and relay wiring

use std::sync::{Arc, Mutex, Once};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;

use carik_relay::application::services::{RelayOptions, RelayService};
use carik_relay::infrastructure::adapters::telegram::TelegramAdapter;
use carik_relay::infrastructure::llm::OpenAIProvider;
use carik_relay::infrastructure::server::{self, AppState};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

/// Upstream stand-in that records `(path, json body)` pairs
pub struct Upstream {
    pub url: String,
    seen: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

impl Upstream {
    pub async fn start(status: u16, body: serde_json::Value) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let canned = Canned {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            seen: seen.clone(),
        };

        let app = Router::new().fallback(record).with_state(canned);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { url, seen }
    }

    pub fn seen(&self) -> Vec<(String, serde_json::Value)> {
        self.seen.lock().unwrap().clone()
    }
}

async fn record(State(canned): State<Canned>, uri: Uri, body: Bytes) -> impl IntoResponse {
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    canned.seen.lock().unwrap().push((uri.path().to_string(), json));
    (
        canned.status,
        [("content-type", "application/json")],
        canned.body.clone(),
    )
}

pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }]
    })
}

pub fn sent_ok() -> serde_json::Value {
    serde_json::json!({ "ok": true, "result": { "message_id": 1 } })
}

/// Router wired to real clients pointed at the two stubs
pub fn relay_app(openai: &Upstream, telegram: &Upstream, options: RelayOptions) -> Router {
    let llm = OpenAIProvider::new("sk-test", None).with_api_base(format!("{}/v1", openai.url));
    let bot = TelegramAdapter::new("42:TEST").with_api_base(telegram.url.clone());
    let relay = RelayService::new(Arc::new(llm), Arc::new(bot), options);
    server::router(AppState::new(relay), "/webhook")
}
