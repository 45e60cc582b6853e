// src/provider/mod.rs — Model provider layer

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::config::ModelsConfig;
use crate::infra::errors::InterviewError;

/// Core trait that all model providers implement.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InterviewError>;
}

#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    #[default]
    Unknown,
}

/// Reference to a specific model on a specific provider.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModelRef {
    pub provider: String,
    pub model: String,
}

impl ModelRef {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Parse "provider/model" format
    pub fn parse(s: &str) -> Option<Self> {
        let (provider, model) = s.split_once('/')?;
        if provider.is_empty() || model.is_empty() {
            return None;
        }
        Some(Self {
            provider: provider.to_string(),
            model: model.to_string(),
        })
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Build the provider named by `model_ref` from config and environment.
///
/// Only OpenAI-compatible endpoints are supported; `models.base_url` points
/// the client at a self-hosted or proxy endpoint.
pub fn resolve(
    model_ref: &ModelRef,
    config: &ModelsConfig,
) -> Result<Arc<dyn ModelProvider>, InterviewError> {
    match model_ref.provider.as_str() {
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                InterviewError::Config("OPENAI_API_KEY is not set".into())
            })?;
            let provider = match &config.base_url {
                Some(url) => openai::OpenAIProvider::with_base_url(api_key, url.clone()),
                None => openai::OpenAIProvider::new(api_key),
            };
            Ok(Arc::new(provider))
        }
        other => Err(InterviewError::Config(format!(
            "Unsupported model provider '{other}' (expected 'openai')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ref_parse() {
        let r = ModelRef::parse("openai/gpt-4.1-mini").unwrap();
        assert_eq!(r.provider, "openai");
        assert_eq!(r.model, "gpt-4.1-mini");
    }

    #[test]
    fn test_model_ref_parse_rejects_partial() {
        assert!(ModelRef::parse("no-slash").is_none());
        assert!(ModelRef::parse("").is_none());
        assert!(ModelRef::parse("openai/").is_none());
    }

    #[test]
    fn test_model_ref_display() {
        let r = ModelRef::new("openai", "gpt-4.1");
        assert_eq!(format!("{}", r), "openai/gpt-4.1");
    }

    #[test]
    fn test_resolve_unknown_provider() {
        let err = resolve(&ModelRef::new("acme", "m"), &ModelsConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, InterviewError::Config(_)));
    }

    #[test]
    fn test_token_usage_total() {
        let u = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(u.total(), 150);
    }

    #[test]
    fn test_message_user() {
        let m = Message::user("Hello");
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "Hello");
    }
}
