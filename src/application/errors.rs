//! Application layer errors

use thiserror::Error;

use crate::infrastructure::llm::LLMError;

/// Messaging platform errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BotError::Timeout(e.to_string())
        } else if e.is_decode() {
            BotError::Parse(e.to_string())
        } else {
            BotError::Network(e.to_string())
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Per-request relay failures.
///
/// Each variant maps to one HTTP status on the webhook response; see
/// [`RelayError::status_code`].
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] LLMError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] BotError),
}

impl RelayError {
    /// HTTP status reported back to the webhook caller.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MalformedPayload(_) => 400,
            RelayError::Upstream(_) | RelayError::Delivery(_) => 500,
        }
    }

    /// Short machine-readable label used in acknowledgments.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MalformedPayload(_) => "rejected",
            RelayError::Upstream(_) => "upstream_error",
            RelayError::Delivery(_) => "delivery_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RelayError::MalformedPayload("x".into()).status_code(), 400);
        assert_eq!(RelayError::Upstream(LLMError::RateLimited).status_code(), 500);
        assert_eq!(
            RelayError::Delivery(BotError::Network("down".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = BotError::Api {
            status: 400,
            description: "Bad Request: chat not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "Telegram API error (400): Bad Request: chat not found"
        );
    }
}
