//! HTTP server - Webhook and liveness routes

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::application::errors::RelayError;
use crate::application::services::{RelayOutcome, RelayService};

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

impl AppState {
    pub fn new(relay: RelayService) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

/// Webhook acknowledgment body
#[derive(Debug, Serialize)]
pub struct Acknowledgment {
    pub ok: bool,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        let body = Acknowledgment {
            ok: true,
            status: self.as_str(),
            error: None,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // Downstream details stay in the logs.
        let error = match &self {
            RelayError::MalformedPayload(reason) => reason.clone(),
            RelayError::Upstream(_) => "completion provider request failed".to_string(),
            RelayError::Delivery(_) => "reply delivery failed".to_string(),
        };
        let body = Acknowledgment {
            ok: false,
            status: self.kind(),
            error: Some(error),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router; the webhook answers on `/` and on `webhook_path`
pub fn router(state: AppState, webhook_path: &str) -> Router {
    let mut app = Router::new().route("/", get(liveness).post(webhook));

    if webhook_path != "/" {
        app = app.route(webhook_path, post(webhook));
    }

    app.with_state(state)
}

/// `GET /`
async fn liveness() -> &'static str {
    "carik-relay is running"
}

/// `POST /` - Telegram webhook
async fn webhook(State(state): State<AppState>, body: Result<Bytes, BytesRejection>) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return unreadable_body(rejection),
    };

    match state.relay.handle(&body).await {
        Ok(outcome) => {
            tracing::debug!("Webhook handled: {}", outcome.as_str());
            outcome.into_response()
        }
        Err(e) => {
            if let RelayError::MalformedPayload(reason) = &e {
                tracing::warn!("Rejected webhook payload: {}", reason);
            }
            e.into_response()
        }
    }
}

/// Body could not be buffered (e.g. over the size limit); keeps the rejection's status
fn unreadable_body(rejection: BytesRejection) -> Response {
    let reason = rejection.body_text();
    tracing::warn!("Rejected webhook payload: {}", reason);

    let ack = Acknowledgment {
        ok: false,
        status: "rejected",
        error: Some(reason),
    };
    (rejection.status(), Json(ack)).into_response()
}
