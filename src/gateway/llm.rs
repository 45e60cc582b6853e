// src/gateway/llm.rs — Language model gateway
//
// Wraps a provider with a model id and a bounded timeout. Transport failures
// and timeouts surface as errors; bad content never does.

use std::sync::Arc;
use std::time::Duration;

use crate::core::reply::parse_model_reply;
use crate::core::types::ModelReply;
use crate::infra::errors::InterviewError;
use crate::provider::{ChatRequest, Message, ModelProvider};

const INTERVIEWER_SYSTEM: &str = "You are an experienced technical interviewer running a live, \
     spoken mock interview. Keep questions concise and conversational. \
     When asked for JSON, reply with a single JSON object and nothing else.";

#[derive(Clone)]
pub struct LanguageModelGateway {
    provider: Arc<dyn ModelProvider>,
    model_id: String,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl LanguageModelGateway {
    pub fn new(provider: Arc<dyn ModelProvider>, model_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
            timeout,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Send a prompt and parse the reply into interview directives.
    pub async fn ask(&self, prompt: &str) -> Result<ModelReply, InterviewError> {
        let raw = self.ask_text(prompt).await?;
        Ok(parse_model_reply(&raw))
    }

    /// Send a prompt and return the raw reply text.
    pub async fn ask_text(&self, prompt: &str) -> Result<String, InterviewError> {
        let request = ChatRequest {
            model: self.model_id.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            system: Some(INTERVIEWER_SYSTEM.to_string()),
        };

        let started = std::time::Instant::now();
        let response = tokio::time::timeout(self.timeout, self.provider.chat(request))
            .await
            .map_err(|_| InterviewError::GatewayTimeout {
                gateway: "llm".into(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|e| match e {
                e @ (InterviewError::GatewayTransport { .. } | InterviewError::GatewayTimeout { .. }) => e,
                other => InterviewError::transport("llm", other.to_string()),
            })?;

        tracing::debug!(
            model = %self.model_id,
            provider = self.provider.id(),
            tokens = response.usage.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model call completed"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatResponse, StopReason, TokenUsage};
    use async_trait::async_trait;

    struct Canned(&'static str);

    #[async_trait]
    impl ModelProvider for Canned {
        fn id(&self) -> &str {
            "canned"
        }
        fn name(&self) -> &str {
            "Canned"
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, InterviewError> {
            Ok(ChatResponse {
                content: self.0.to_string(),
                usage: TokenUsage::default(),
                stop_reason: StopReason::EndTurn,
            })
        }
    }

    struct Hangs;

    #[async_trait]
    impl ModelProvider for Hangs {
        fn id(&self) -> &str {
            "hangs"
        }
        fn name(&self) -> &str {
            "Hangs"
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, InterviewError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(InterviewError::transport("hangs", "unreachable"))
        }
    }

    struct Broken;

    #[async_trait]
    impl ModelProvider for Broken {
        fn id(&self) -> &str {
            "broken"
        }
        fn name(&self) -> &str {
            "Broken"
        }
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, InterviewError> {
            Err(InterviewError::Config("bad key".into()))
        }
    }

    #[tokio::test]
    async fn test_ask_parses_reply() {
        let gw = LanguageModelGateway::new(
            Arc::new(Canned(r#"{"question":"Hello?","isWrapUp":true}"#)),
            "m",
            Duration::from_secs(5),
        );
        let reply = gw.ask("prompt").await.unwrap();
        assert_eq!(reply.question, "Hello?");
        assert!(reply.is_wrap_up);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_transport_error() {
        let gw = LanguageModelGateway::new(Arc::new(Hangs), "m", Duration::from_secs(30));
        let err = gw.ask("prompt").await.unwrap_err();
        assert!(matches!(err, InterviewError::GatewayTimeout { secs: 30, .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_provider_errors_become_transport() {
        let gw = LanguageModelGateway::new(Arc::new(Broken), "m", Duration::from_secs(5));
        let err = gw.ask_text("prompt").await.unwrap_err();
        assert!(err.is_transport());
    }
}
