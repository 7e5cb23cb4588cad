//! OpenAI Provider - Chat completions over any OpenAI-compatible endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::config::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::infrastructure::llm::{LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, LLM};

/// OpenAI provider
pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    client: Client,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        }
    }

    /// Point the provider at a different OpenAI-compatible server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Get base URL for API
    fn base_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<LLMMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Choice in response
#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

/// Response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Usage information
#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

#[async_trait]
impl LLM for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        let model = model.unwrap_or(&self.model);

        let request = ChatRequest {
            model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(self.base_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LLMError::ParseError(e.to_string()))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| LLMError::InvalidResponse("Choice has no message content".to_string()))?;

        let usage = chat_response.usage.map(|u| LLMUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LLMResponse {
            content,
            model: chat_response.model.unwrap_or_else(|| model.to_string()),
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}
