// src/core/audio.rs — Audio ingest: concurrent transcription + prosody with fallbacks

use std::sync::Arc;
use std::time::Duration;

use crate::core::types::ToneVector;
use crate::gateway::{ToneAnalyzer, Transcriber};
use crate::infra::errors::InterviewError;

pub const FALLBACK_TRANSCRIPT: &str = "Could not transcribe audio. Please try speaking again.";
pub const DEFAULT_MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// Result of ingesting one spoken answer. Both parts are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedAnswer {
    pub transcript: String,
    pub tone: ToneVector,
    /// True when the transcript is the fallback text.
    pub transcript_degraded: bool,
    /// True when the tone is the neutral fallback.
    pub tone_degraded: bool,
}

pub struct AudioIngest {
    transcriber: Arc<dyn Transcriber>,
    analyzer: Arc<dyn ToneAnalyzer>,
    transcription_timeout: Duration,
    prosody_timeout: Duration,
    max_bytes: usize,
}

impl AudioIngest {
    pub fn new(transcriber: Arc<dyn Transcriber>, analyzer: Arc<dyn ToneAnalyzer>) -> Self {
        Self {
            transcriber,
            analyzer,
            transcription_timeout: Duration::from_secs(30),
            prosody_timeout: Duration::from_secs(30),
            max_bytes: DEFAULT_MAX_AUDIO_BYTES,
        }
    }

    pub fn with_timeouts(mut self, transcription: Duration, prosody: Duration) -> Self {
        self.transcription_timeout = transcription;
        self.prosody_timeout = prosody;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Reject empty or oversize payloads before any gateway is called.
    pub fn validate(&self, audio: &[u8]) -> Result<(), InterviewError> {
        if audio.is_empty() {
            return Err(InterviewError::InvalidAudioPayload {
                reason: "audio payload is empty".into(),
            });
        }
        if audio.len() > self.max_bytes {
            return Err(InterviewError::InvalidAudioPayload {
                reason: format!(
                    "audio payload is {} bytes, limit is {}",
                    audio.len(),
                    self.max_bytes
                ),
            });
        }
        Ok(())
    }

    /// Run transcription and prosody concurrently and join both outcomes.
    ///
    /// A failure (or timeout) on one side is replaced by its fallback value.
    /// Only when both sides fail is the submission rejected, so the client
    /// can retry instead of recording an answer with no content.
    pub async fn ingest(&self, audio: &[u8]) -> Result<IngestedAnswer, InterviewError> {
        self.validate(audio)?;

        let (transcript, tone) = tokio::join!(
            bounded("transcription", self.transcription_timeout, self.transcriber.transcribe(audio)),
            bounded("prosody", self.prosody_timeout, self.analyzer.analyze(audio)),
        );

        match (transcript, tone) {
            (Err(t_err), Err(p_err)) => {
                tracing::error!(
                    transcription_error = %t_err,
                    prosody_error = %p_err,
                    "Both audio gateways failed"
                );
                Err(InterviewError::transport(
                    "audio",
                    format!("transcription: {t_err}; prosody: {p_err}"),
                ))
            }
            (transcript, tone) => {
                let (transcript, transcript_degraded) = match transcript {
                    Ok(text) => (text, false),
                    Err(e) => {
                        tracing::warn!(
                            gateway = self.transcriber.id(),
                            error = %e,
                            "Transcription failed, using fallback transcript"
                        );
                        (FALLBACK_TRANSCRIPT.to_string(), true)
                    }
                };
                let (tone, tone_degraded) = match tone {
                    Ok(t) => (t.clamped(), false),
                    Err(e) => {
                        tracing::warn!(
                            gateway = self.analyzer.id(),
                            error = %e,
                            "Prosody analysis failed, using neutral tone"
                        );
                        (ToneVector::NEUTRAL, true)
                    }
                };
                Ok(IngestedAnswer {
                    transcript,
                    tone,
                    transcript_degraded,
                    tone_degraded,
                })
            }
        }
    }
}

async fn bounded<T>(
    gateway: &str,
    limit: Duration,
    call: impl std::future::Future<Output = Result<T, InterviewError>>,
) -> Result<T, InterviewError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| InterviewError::GatewayTimeout {
            gateway: gateway.to_string(),
            secs: limit.as_secs(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedTranscriber(Option<&'static str>);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        fn id(&self) -> &str {
            "fixed"
        }
        async fn transcribe(&self, _audio: &[u8]) -> Result<String, InterviewError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| InterviewError::transport("transcription", "down"))
        }
    }

    struct FixedTone(Option<ToneVector>);

    #[async_trait]
    impl ToneAnalyzer for FixedTone {
        fn id(&self) -> &str {
            "fixed"
        }
        async fn analyze(&self, _audio: &[u8]) -> Result<ToneVector, InterviewError> {
            self.0
                .ok_or_else(|| InterviewError::transport("prosody", "down"))
        }
    }

    struct SlowTranscriber;

    #[async_trait]
    impl Transcriber for SlowTranscriber {
        fn id(&self) -> &str {
            "slow"
        }
        async fn transcribe(&self, _audio: &[u8]) -> Result<String, InterviewError> {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok("late".into())
        }
    }

    fn tone() -> ToneVector {
        ToneVector {
            confidence: 9.0,
            stress: 2.0,
            engagement: 9.0,
            clarity: 9.0,
            pace: 6.0,
            volume: 7.0,
        }
    }

    fn ingest(t: Option<&'static str>, p: Option<ToneVector>) -> AudioIngest {
        AudioIngest::new(Arc::new(FixedTranscriber(t)), Arc::new(FixedTone(p)))
    }

    #[tokio::test]
    async fn test_both_succeed() {
        let out = ingest(Some("I would use a hash map"), Some(tone()))
            .ingest(b"audio")
            .await
            .unwrap();
        assert_eq!(out.transcript, "I would use a hash map");
        assert_eq!(out.tone, tone());
        assert!(!out.transcript_degraded && !out.tone_degraded);
    }

    #[tokio::test]
    async fn test_transcription_failure_uses_fallback_text() {
        let out = ingest(None, Some(tone())).ingest(b"audio").await.unwrap();
        assert_eq!(out.transcript, FALLBACK_TRANSCRIPT);
        assert!(out.transcript_degraded);
        assert_eq!(out.tone, tone());
    }

    #[tokio::test]
    async fn test_prosody_failure_uses_neutral_tone() {
        let out = ingest(Some("hello"), None).ingest(b"audio").await.unwrap();
        assert_eq!(out.tone, ToneVector::NEUTRAL);
        assert!(out.tone_degraded);
        assert_eq!(out.transcript, "hello");
    }

    #[tokio::test]
    async fn test_both_failing_is_rejected() {
        let err = ingest(None, None).ingest(b"audio").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_empty_and_oversize_rejected() {
        let i = ingest(Some("x"), Some(tone())).with_max_bytes(4);
        assert!(matches!(
            i.ingest(b"").await,
            Err(InterviewError::InvalidAudioPayload { .. })
        ));
        assert!(matches!(
            i.ingest(b"12345").await,
            Err(InterviewError::InvalidAudioPayload { .. })
        ));
        assert!(i.ingest(b"1234").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_transcription_times_out_into_fallback() {
        let i = AudioIngest::new(Arc::new(SlowTranscriber), Arc::new(FixedTone(Some(tone()))))
            .with_timeouts(Duration::from_secs(10), Duration::from_secs(10));
        let out = i.ingest(b"audio").await.unwrap();
        assert_eq!(out.transcript, FALLBACK_TRANSCRIPT);
        assert_eq!(out.tone, tone());
    }
}
