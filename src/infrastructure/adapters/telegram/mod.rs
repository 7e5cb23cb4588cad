//! Telegram adapter

pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::errors::BotError;
use crate::domain::entities::ChatId;
use crate::domain::traits::Bot;

use types::{ApiResponse, DeleteWebhookRequest, MessageResult, SendMessageRequest, SetWebhookRequest};

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Telegram's limit on text message length
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    parse_mode: Option<String>,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: API_BASE.to_string(),
            client: Client::new(),
            parse_mode: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Parse mode sent with every message ("MarkdownV2", "HTML", ...)
    pub fn with_parse_mode(mut self, parse_mode: Option<String>) -> Self {
        self.parse_mode = parse_mode.filter(|m| !m.trim().is_empty());
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Token prefix safe to print
    pub fn redacted_token(&self) -> String {
        let prefix: String = self.token.chars().take(8).collect();
        format!("{}...", prefix)
    }

    /// Invoke a Bot API method and unwrap its `result`
    async fn call<P, R>(&self, method: &str, payload: &P) -> Result<R, BotError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: Result<ApiResponse<R>, _> = serde_json::from_str(&body);
        match parsed {
            Ok(data) if status.is_success() && data.ok => data
                .result
                .ok_or_else(|| BotError::Parse(format!("{} returned no result", method))),
            Ok(data) => Err(BotError::Api {
                status: data.error_code.unwrap_or(status.as_u16()),
                description: data
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
            Err(_) if !status.is_success() => Err(BotError::Api {
                status: status.as_u16(),
                description: body.chars().take(200).collect(),
            }),
            Err(e) => Err(BotError::Parse(e.to_string())),
        }
    }

    /// Register `url` as the bot's webhook
    pub async fn set_webhook(&self, url: &str, drop_pending_updates: bool) -> Result<(), BotError> {
        let request = SetWebhookRequest {
            url,
            allowed_updates: vec!["message"],
            drop_pending_updates,
        };

        let _: bool = self.call("setWebhook", &request).await?;
        tracing::info!("Webhook set to {}", url);
        Ok(())
    }

    /// Remove the bot's webhook
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), BotError> {
        let request = DeleteWebhookRequest { drop_pending_updates };

        let _: bool = self.call("deleteWebhook", &request).await?;
        tracing::info!("Webhook deleted");
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    fn platform(&self) -> &str {
        "telegram"
    }

    fn max_message_length(&self) -> usize {
        MAX_MESSAGE_LENGTH
    }

    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text.chars().take(100).collect::<String>());

        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: self.parse_mode.as_deref(),
        };

        let result: MessageResult = self.call("sendMessage", &request).await?;
        Ok(result.message_id.to_string())
    }
}
