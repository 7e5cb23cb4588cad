//! Configuration management
//!
//! Precedence, lowest first: built-in defaults, YAML file, environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::infrastructure::adapters::telegram;
use crate::infrastructure::llm::LLMConfig;

/// Relay configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub llm: LLMConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Extra POST route for the webhook, next to `/`
    pub webhook_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_base: String,
    pub parse_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RelayConfig {
    /// Accept and drop messages starting with `command-prefix`
    pub ignore_commands: bool,
    pub command_prefix: String,
    /// Sent to the chat in place of a reply when the completion call fails
    pub fallback_reply: Option<String>,
    /// Per outbound call
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            webhook_path: "/webhook".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: telegram::API_BASE.to_string(),
            parse_mode: None,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            ignore_commands: true,
            command_prefix: "/".to_string(),
            fallback_reply: None,
            timeout_secs: 15,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{}={}", key, value)))
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read {}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Overlay values from an environment-style lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TELEGRAM_TOKEN") {
            self.telegram.token = Some(token);
        }
        if let Some(base) = lookup("TELEGRAM_API_BASE") {
            self.telegram.api_base = base;
        }
        if let Some(mode) = lookup("TELEGRAM_PARSE_MODE") {
            self.telegram.parse_mode = Some(mode);
        }

        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(path) = lookup("WEBHOOK_PATH") {
            self.server.webhook_path = path;
        }

        if let Some(reply) = lookup("RELAY_FALLBACK_REPLY") {
            self.relay.fallback_reply = Some(reply);
        }
        if let Some(secs) = lookup("RELAY_TIMEOUT_SECS") {
            self.relay.timeout_secs = parse_env("RELAY_TIMEOUT_SECS", &secs)?;
        }
        if let Some(flag) = lookup("RELAY_IGNORE_COMMANDS") {
            self.relay.ignore_commands = parse_env("RELAY_IGNORE_COMMANDS", &flag)?;
        }

        self.llm.apply_env(&lookup)
    }

    /// Check that the relay can start
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_token().is_none() {
            return Err(ConfigError::MissingField("TELEGRAM_TOKEN".to_string()));
        }
        if self.llm.api_key().is_none() {
            return Err(ConfigError::MissingField("OPENAI_API_KEY".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue("llm.model must not be empty".to_string()));
        }
        if self.relay.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("relay.timeout-secs must be positive".to_string()));
        }
        if !self.server.webhook_path.starts_with('/') {
            return Err(ConfigError::InvalidValue(format!(
                "server.webhook-path must start with '/': {}",
                self.server.webhook_path
            )));
        }
        Ok(())
    }

    /// Telegram token, if one is configured and non-empty
    pub fn telegram_token(&self) -> Option<&str> {
        self.telegram.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// HTTP client for outbound calls, bounded by `relay.timeout-secs`
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.relay.timeout_secs))
            .build()
    }
}
