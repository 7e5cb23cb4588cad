//! carik-relay - Telegram to LLM webhook relay
//!
//! Receives Telegram webhook updates, asks an OpenAI-compatible completion
//! API for a reply, and sends the reply back to the originating chat.

pub mod domain;
pub mod application;
pub mod infrastructure;
