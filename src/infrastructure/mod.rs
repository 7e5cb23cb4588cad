//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Telegram)
//! - LLM: Completion providers
//! - Server: Inbound HTTP routes

pub mod config;
pub mod adapters;
pub mod llm;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;
