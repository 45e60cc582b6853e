// src/gateway/prosody.rs — Tone (prosody) analysis gateway

use async_trait::async_trait;

use crate::core::types::ToneVector;
use crate::infra::errors::InterviewError;

#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    fn id(&self) -> &str;

    async fn analyze(&self, audio: &[u8]) -> Result<ToneVector, InterviewError>;
}

/// Posts raw audio to a prosody service that answers with a tone JSON object,
/// either bare or wrapped as `{"tone": {...}}`.
pub struct HttpToneAnalyzer {
    client: reqwest::Client,
    url: String,
}

impl HttpToneAnalyzer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

/// Decode a tone response body, clamping every dimension into [1, 10].
pub fn decode_tone(body: &serde_json::Value) -> Result<ToneVector, InterviewError> {
    let inner = body.get("tone").unwrap_or(body);
    let tone: ToneVector = serde_json::from_value(inner.clone()).map_err(|e| {
        InterviewError::transport("prosody", format!("unexpected tone payload: {e}"))
    })?;
    Ok(tone.clamped())
}

#[async_trait]
impl ToneAnalyzer for HttpToneAnalyzer {
    fn id(&self) -> &str {
        "http-prosody"
    }

    async fn analyze(&self, audio: &[u8]) -> Result<ToneVector, InterviewError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| InterviewError::transport("prosody", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InterviewError::transport(
                "prosody",
                format!("HTTP {}", status),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InterviewError::transport("prosody", e.to_string()))?;
        decode_tone(&body)
    }
}

/// Stand-in when no prosody service is configured. Always fails, so the
/// ingest coordinator records the neutral tone.
pub struct DisabledToneAnalyzer;

#[async_trait]
impl ToneAnalyzer for DisabledToneAnalyzer {
    fn id(&self) -> &str {
        "disabled"
    }

    async fn analyze(&self, _audio: &[u8]) -> Result<ToneVector, InterviewError> {
        Err(InterviewError::transport(
            "prosody",
            "no prosody endpoint configured",
        ))
    }
}
