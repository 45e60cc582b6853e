// src/provider/openai.rs — OpenAI Chat Completions provider

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider, Role, StopReason, TokenUsage};
use crate::infra::errors::InterviewError;

pub struct OpenAIProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openai.com/v1".into())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn transport(message: impl Into<String>) -> InterviewError {
        InterviewError::transport("openai", message)
    }
}

/// Build the Chat Completions request body.
pub(crate) fn request_body(request: &ChatRequest) -> serde_json::Value {
    let mut msgs = Vec::new();
    if let Some(system) = &request.system {
        msgs.push(serde_json::json!({ "role": "system", "content": system }));
    }
    for m in &request.messages {
        let role = match m.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        msgs.push(serde_json::json!({ "role": role, "content": m.content }));
    }

    let mut body = serde_json::json!({
        "model": request.model,
        "messages": msgs,
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = serde_json::json!(max_tokens);
    }
    if let Some(temp) = request.temperature {
        body["temperature"] = serde_json::json!(temp);
    }
    body
}

/// Extract content, usage, and stop reason from a Chat Completions response.
pub(crate) fn parse_response(resp: &serde_json::Value) -> ChatResponse {
    let choice = &resp["choices"][0];
    let content = choice["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string();

    let usage = TokenUsage {
        input_tokens: resp["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        output_tokens: resp["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    };

    let stop_reason = match choice["finish_reason"].as_str() {
        Some("stop") => StopReason::EndTurn,
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::Unknown,
    };

    ChatResponse {
        content,
        usage,
        stop_reason,
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InterviewError> {
        let body = request_body(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::transport(format!("HTTP {}: {}", status, error_body)));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Self::transport(format!("Failed to parse response: {}", e)))?;

        Ok(parse_response(&resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Message;

    #[test]
    fn test_request_body_includes_system_first() {
        let req = ChatRequest {
            model: "gpt-4.1-mini".into(),
            messages: vec![Message::user("hi")],
            max_tokens: Some(256),
            temperature: Some(0.3),
            system: Some("You are an interviewer.".into()),
        };
        let body = request_body(&req);
        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_request_body_omits_unset_options() {
        let req = ChatRequest {
            model: "m".into(),
            messages: vec![Message::user("x")],
            ..Default::default()
        };
        let body = request_body(&req);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_response() {
        let resp = serde_json::json!({
            "choices": [{ "message": { "content": "{\"question\":\"Hi\"}" }, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 5 }
        });
        let parsed = parse_response(&resp);
        assert_eq!(parsed.content, "{\"question\":\"Hi\"}");
        assert_eq!(parsed.usage.total(), 17);
        assert!(matches!(parsed.stop_reason, StopReason::EndTurn));
    }

    #[test]
    fn test_parse_response_missing_fields() {
        let parsed = parse_response(&serde_json::json!({}));
        assert_eq!(parsed.content, "");
        assert_eq!(parsed.usage.total(), 0);
    }
}
