// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub gateways: GatewaysConfig,

    #[serde(default)]
    pub interview: InterviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model that asks questions and writes the final summary.
    pub interviewer: String,
    /// Model that scores code submissions.
    pub evaluator: String,
    /// Override for OpenAI-compatible endpoints.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            interviewer: "openai/gpt-4.1-mini".into(),
            evaluator: "openai/gpt-4.1-mini".into(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaysConfig {
    pub llm_timeout_secs: u64,
    pub transcription_timeout_secs: u64,
    pub prosody_timeout_secs: u64,
    pub transcription_model: String,
    /// Prosody service endpoint. When unset every analysis falls back to the neutral tone.
    #[serde(default)]
    pub prosody_url: Option<String>,
}

impl Default for GatewaysConfig {
    fn default() -> Self {
        Self {
            llm_timeout_secs: 30,
            transcription_timeout_secs: 30,
            prosody_timeout_secs: 30,
            transcription_model: "whisper-1".into(),
            prosody_url: None,
        }
    }
}

impl GatewaysConfig {
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_secs)
    }

    pub fn prosody_timeout(&self) -> Duration {
        Duration::from_secs(self.prosody_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    pub dsa_problem_count: usize,
    pub max_audio_bytes: usize,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    pub archive_transcripts: bool,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            dsa_problem_count: 3,
            max_audio_bytes: 10 * 1024 * 1024,
            catalog_path: None,
            archive_transcripts: true,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
