use serde::{Deserialize, Serialize};
use std::fmt;

/// Ellipsis appended to truncated replies
const ELLIPSIS: char = '…';

/// Chat identifier as accepted by the messaging platform
///
/// Telegram uses numeric ids for chats and `@username` strings for public
/// channels; both forms are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl ChatId {
    /// Whether the identifier can address a chat
    pub fn is_resolvable(&self) -> bool {
        match self {
            ChatId::Id(_) => true,
            ChatId::Username(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Username(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(name: &str) -> Self {
        ChatId::Username(name.to_string())
    }
}

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// `raw` is the message text exactly as received
    Command {
        name: String,
        args: Vec<String>,
        raw: String,
    },
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// Inbound chat message extracted from a webhook update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub content: Content,
}

impl InboundMessage {
    pub fn new(chat_id: impl Into<ChatId>, content: Content) -> Self {
        Self {
            chat_id: chat_id.into(),
            content,
        }
    }

    pub fn from_text(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }
}

/// Reply bound for a chat, already fitted to the platform's length limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: ChatId,
    pub text: String,
}

impl OutboundReply {
    pub fn new(chat_id: ChatId, text: impl Into<String>, max_len: usize) -> Self {
        Self {
            chat_id,
            text: truncate(&text.into(), max_len),
        }
    }
}

/// Shorten `text` to at most `max_len` characters.
///
/// Counts chars, never splits a code point. When shortened, the last kept
/// character is replaced by an ellipsis.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len == 0 {
        return String::new();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_text() {
        let out = truncate("abcdefghij", 5);
        assert_eq!(out, "abcd…");
        assert_eq!(out.chars().count(), 5);
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "привет мир, как дела";
        let out = truncate(text, 7);
        assert_eq!(out.chars().count(), 7);
        assert!(out.starts_with("привет"));
    }

    #[test]
    fn test_truncate_degenerate_limits() {
        assert_eq!(truncate("abc", 0), "");
        assert_eq!(truncate("abc", 1), "…");
    }

    #[test]
    fn test_outbound_reply_never_exceeds_limit() {
        let long = "x".repeat(10_000);
        let reply = OutboundReply::new(ChatId::Id(42), long, 4096);
        assert_eq!(reply.text.chars().count(), 4096);
        assert_eq!(reply.chat_id, ChatId::Id(42));
    }

    #[test]
    fn test_chat_id_serde_untagged() {
        let id: ChatId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ChatId::Id(42));

        let name: ChatId = serde_json::from_str("\"@news\"").unwrap();
        assert_eq!(name, ChatId::Username("@news".into()));

        assert_eq!(serde_json::to_string(&ChatId::Id(-100123)).unwrap(), "-100123");
        assert!(serde_json::from_str::<ChatId>("true").is_err());
    }

    #[test]
    fn test_chat_id_resolvable() {
        assert!(ChatId::Id(0).is_resolvable());
        assert!(ChatId::from("@news").is_resolvable());
        assert!(!ChatId::from("  ").is_resolvable());
    }
}
