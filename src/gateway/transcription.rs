// src/gateway/transcription.rs — Speech-to-text gateway

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::infra::errors::InterviewError;

#[async_trait]
pub trait Transcriber: Send + Sync {
    fn id(&self) -> &str;

    /// Transcribe one spoken answer. An empty string is a valid result.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, InterviewError>;
}

/// OpenAI audio transcription endpoint (Whisper).
pub struct WhisperTranscriber {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, "https://api.openai.com/v1".into())
    }

    pub fn with_base_url(api_key: String, model: impl Into<String>, base_url: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn transport(message: impl Into<String>) -> InterviewError {
        InterviewError::transport("transcription", message)
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    fn id(&self) -> &str {
        "whisper"
    }

    async fn transcribe(&self, audio: &[u8]) -> Result<String, InterviewError> {
        let file = Part::bytes(audio.to_vec())
            .file_name("answer.webm")
            .mime_str("audio/webm")
            .map_err(|e| Self::transport(e.to_string()))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::transport(format!("HTTP {}: {}", status, error_body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Self::transport(format!("Failed to parse response: {}", e)))?;

        Ok(body["text"].as_str().unwrap_or("").trim().to_string())
    }
}
