//! LLM Configuration

use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    /// Provider API key (required)
    pub api_key: Option<String>,
    /// Base URL, without the trailing `/chat/completions`
    pub api_base: String,
    pub model: String,

    /// Generation settings
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.7),
            max_tokens: Some(1024),
            system_prompt: None,
        }
    }
}

impl LLMConfig {
    /// Overlay values from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.api_base = base;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.model = model;
        }
        if let Some(prompt) = lookup("LLM_SYSTEM_PROMPT") {
            self.system_prompt = Some(prompt);
        }
        if let Some(temp) = lookup("LLM_TEMPERATURE") {
            let t = temp
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("LLM_TEMPERATURE={}", temp)))?;
            self.temperature = Some(t);
        }
        if let Some(max) = lookup("LLM_MAX_TOKENS") {
            let m = max
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("LLM_MAX_TOKENS={}", max)))?;
            self.max_tokens = Some(m);
        }

        Ok(())
    }

    /// API key, if one is configured and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}
