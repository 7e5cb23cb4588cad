use async_trait::async_trait;
use crate::domain::entities::ChatId;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Platform name, for logs
    fn platform(&self) -> &str;

    /// Longest text the platform accepts in a single message
    fn max_message_length(&self) -> usize;

    /// Send a message to a chat, returning the platform's message id
    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<String, BotError>;
}
