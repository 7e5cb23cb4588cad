use std::sync::Arc;

use crate::application::errors::RelayError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{ChatId, Content, InboundMessage, OutboundReply};
use crate::domain::traits::Bot;
use crate::infrastructure::config::Config;
use crate::infrastructure::llm::{LLMError, LLMMessage, LLM};

/// Relay behaviour and generation parameters, fixed at startup
#[derive(Debug, Clone)]
pub struct RelayOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub ignore_commands: bool,
    pub command_prefix: String,
    pub fallback_reply: Option<String>,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: None,
            max_tokens: None,
            system_prompt: None,
            ignore_commands: true,
            command_prefix: "/".to_string(),
            fallback_reply: None,
        }
    }
}

impl RelayOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: Some(config.llm.model.clone()),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            system_prompt: config.llm.system_prompt.clone(),
            ignore_commands: config.relay.ignore_commands,
            command_prefix: config.relay.command_prefix.clone(),
            fallback_reply: config
                .relay
                .fallback_reply
                .clone()
                .filter(|r| !r.trim().is_empty()),
        }
    }
}

/// Successful relay outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Completion delivered to the chat
    Relayed,
    /// Command message accepted without a completion call
    Ignored,
    /// Completion failed; the fallback text was delivered instead
    Fallback,
}

impl RelayOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayOutcome::Relayed => "relayed",
            RelayOutcome::Ignored => "ignored",
            RelayOutcome::Fallback => "fallback",
        }
    }
}

/// Forwards inbound chat text to the LLM and the reply back to the chat
pub struct RelayService {
    llm: Arc<dyn LLM>,
    bot: Arc<dyn Bot>,
    parser: MessageParser,
    options: RelayOptions,
}

impl RelayService {
    pub fn new(llm: Arc<dyn LLM>, bot: Arc<dyn Bot>, options: RelayOptions) -> Self {
        Self {
            llm,
            bot,
            parser: MessageParser::new(options.command_prefix.clone()),
            options,
        }
    }

    /// Handle one webhook body end to end
    pub async fn handle(&self, body: &[u8]) -> Result<RelayOutcome, RelayError> {
        let message = self.parser.parse(body)?;
        self.relay(message).await
    }

    /// Relay an already parsed message
    pub async fn relay(&self, message: InboundMessage) -> Result<RelayOutcome, RelayError> {
        let text = match message.content {
            Content::Command { ref name, .. } if self.options.ignore_commands => {
                tracing::info!(
                    "Ignoring command {}{} from chat {}",
                    self.options.command_prefix,
                    name,
                    message.chat_id
                );
                return Ok(RelayOutcome::Ignored);
            }
            Content::Command { raw, .. } => raw,
            Content::Text(text) => text,
        };

        tracing::info!("Relaying message from chat {}", message.chat_id);

        let reply = match self.complete(&text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Completion via {} failed: {}", self.llm.name(), e);
                let Some(fallback) = self.options.fallback_reply.clone() else {
                    return Err(e);
                };
                self.deliver(&message.chat_id, &fallback).await?;
                return Ok(RelayOutcome::Fallback);
            }
        };

        self.deliver(&message.chat_id, &reply).await?;
        Ok(RelayOutcome::Relayed)
    }

    /// Ask the LLM for a reply to `text`
    pub async fn complete(&self, text: &str) -> Result<String, RelayError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.options.system_prompt {
            messages.push(LLMMessage::system(prompt.clone()));
        }
        messages.push(LLMMessage::user(text));

        let response = self
            .llm
            .chat(
                messages,
                self.options.model.as_deref(),
                self.options.temperature,
                self.options.max_tokens,
            )
            .await?;

        let content = response.content.trim();
        if content.is_empty() {
            return Err(LLMError::InvalidResponse("empty completion".to_string()).into());
        }

        tracing::debug!(
            "Completion from {} ({}): {}",
            self.llm.name(),
            response.model,
            content.chars().take(100).collect::<String>()
        );
        Ok(content.to_string())
    }

    /// Send `text` to the chat, truncated to the platform limit
    pub async fn deliver(&self, chat_id: &ChatId, text: &str) -> Result<(), RelayError> {
        let reply = OutboundReply::new(chat_id.clone(), text, self.bot.max_message_length());

        match self.bot.send_message(&reply.chat_id, &reply.text).await {
            Ok(message_id) => {
                tracing::debug!("Delivered message {} to chat {}", message_id, reply.chat_id);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to send message via {}: {}", self.bot.platform(), e);
                Err(e.into())
            }
        }
    }
}
