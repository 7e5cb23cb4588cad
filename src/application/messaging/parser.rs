//! Message parser - Turns webhook bodies into inbound messages

use crate::application::errors::RelayError;
use crate::domain::entities::{Content, InboundMessage};
use crate::infrastructure::adapters::telegram::types::Update;

/// Parses webhook request bodies into structured messages
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a raw webhook body
    ///
    /// Rejects anything without both `message.text` and `message.chat.id`.
    pub fn parse(&self, body: &[u8]) -> Result<InboundMessage, RelayError> {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(malformed("empty request body"));
        }

        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| malformed(format!("body is not valid JSON: {}", e)))?;

        if !value.is_object() {
            return Err(malformed("body is not a JSON object"));
        }

        let update: Update = serde_json::from_value(value)
            .map_err(|e| malformed(format!("unexpected update shape: {}", e)))?;

        let message = update
            .message
            .ok_or_else(|| malformed("missing message section"))?;

        let text = message
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| malformed("missing message text"))?;

        let chat_id = message
            .chat
            .and_then(|c| c.id)
            .filter(|id| id.is_resolvable())
            .ok_or_else(|| malformed("missing chat identifier"))?;

        Ok(InboundMessage::new(chat_id, self.classify(text)))
    }

    /// Split command-prefixed text into name and arguments
    fn classify(&self, text: String) -> Content {
        let prefix = self.command_prefix.as_str();
        if prefix.is_empty() || !text.starts_with(prefix) {
            return Content::Text(text);
        }

        let mut parts = text[prefix.len()..].split_whitespace();
        let name = parts
            .next()
            .map(|n| n.split('@').next().unwrap_or(n).to_string())
            .unwrap_or_default();
        let args = parts.map(|s| s.to_string()).collect();

        Content::Command {
            name,
            args,
            raw: text,
        }
    }
}

fn malformed(reason: impl Into<String>) -> RelayError {
    RelayError::MalformedPayload(reason.into())
}
