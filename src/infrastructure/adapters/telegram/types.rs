//! Telegram Bot API payloads

use serde::{Deserialize, Serialize};

use crate::domain::entities::ChatId;

/// Webhook update envelope
///
/// Only the fields the relay reads are modelled; everything else in the
/// update is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: Option<i64>,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: Option<i64>,
    pub chat: Option<Chat>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: Option<ChatId>,
}

/// Generic Bot API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<u16>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResult {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SetWebhookRequest<'a> {
    pub url: &'a str,
    pub allowed_updates: Vec<&'a str>,
    pub drop_pending_updates: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteWebhookRequest {
    pub drop_pending_updates: bool,
}
