//! Domain entities - Per-request records with no external dependencies

pub mod message;

pub use message::{ChatId, Content, InboundMessage, OutboundReply};
