// src/gateway/mod.rs — External collaborators: language model, audio, resume

pub mod llm;
pub mod prosody;
pub mod resume;
pub mod transcription;

pub use llm::LanguageModelGateway;
pub use prosody::{DisabledToneAnalyzer, HttpToneAnalyzer, ToneAnalyzer};
pub use transcription::{Transcriber, WhisperTranscriber};
