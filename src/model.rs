//! Request and response models for the AI endpoints.

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::client::ClientError;
use crate::options::ModelOptions;

/// Longest message content the back-end accepts, in characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Accepted range for the per-request generation timeout, in seconds.
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<f64> = 1.0..=300.0;

/// Role of the message sender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Body of `POST /ai/generate` and `POST /ai/stream`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Conversation history, oldest first
    pub messages: NonEmpty<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generation timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,

    pub stream: bool,
}

impl GenerateRequest {
    /// Non-streaming request built from model options.
    pub fn single(messages: NonEmpty<Message>, model_options: &ModelOptions) -> Self {
        Self::from((messages, model_options))
    }

    /// Streaming request built from model options.
    pub fn streaming(messages: NonEmpty<Message>, model_options: &ModelOptions) -> Self {
        Self {
            stream: true,
            ..Self::from((messages, model_options))
        }
    }

    /// Check the limits the back-end enforces, before any I/O.
    pub fn validate(&self) -> Result<(), ClientError> {
        for (index, message) in self.messages.iter().enumerate() {
            let chars = message.content.chars().count();
            if chars == 0 {
                return Err(ClientError::Validation(format!(
                    "message {} has empty content",
                    index
                )));
            }
            if chars > MAX_CONTENT_CHARS {
                return Err(ClientError::Validation(format!(
                    "message {} is too long ({} characters, max {})",
                    index, chars, MAX_CONTENT_CHARS
                )));
            }
        }

        if let Some(timeout) = self.timeout {
            if !TIMEOUT_RANGE_SECS.contains(&timeout) {
                return Err(ClientError::Validation(format!(
                    "timeout must be between {} and {} seconds, got {}",
                    TIMEOUT_RANGE_SECS.start(),
                    TIMEOUT_RANGE_SECS.end(),
                    timeout
                )));
            }
        }

        Ok(())
    }
}

impl From<(NonEmpty<Message>, &ModelOptions)> for GenerateRequest {
    fn from((messages, model_options): (NonEmpty<Message>, &ModelOptions)) -> Self {
        GenerateRequest {
            messages,
            model: model_options.model.clone(),
            timeout: model_options.timeout.map(|t| t.as_secs_f64()),
            stream: false,
        }
    }
}

/// Body of a successful `POST /ai/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Result of `GET /ai/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub enabled: bool,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl HealthStatus {
    /// Reported when the probe itself fails.
    pub fn unavailable() -> Self {
        Self {
            enabled: false,
            available: false,
            default_model: None,
        }
    }
}
