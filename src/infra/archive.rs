// src/infra/archive.rs — Durable hand-off for finished interviews

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::session::InterviewSession;
use crate::infra::errors::InterviewError;

/// What survives a finalized session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub session: InterviewSession,
    pub summary_text: String,
    pub finalized_at: DateTime<Utc>,
}

#[async_trait]
pub trait TranscriptArchive: Send + Sync {
    async fn store(&self, record: &InterviewRecord) -> Result<(), InterviewError>;
}

/// Writes one pretty-printed JSON file per session under `dir`.
pub struct JsonFileArchive {
    dir: PathBuf,
}

impl JsonFileArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }
}

#[async_trait]
impl TranscriptArchive for JsonFileArchive {
    async fn store(&self, record: &InterviewRecord) -> Result<(), InterviewError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(record.session.id());
        let json = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, json).await?;
        tracing::info!(path = %path.display(), "Interview transcript archived");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CandidateProfile, CompanyProfile, InterviewKind};

    #[tokio::test]
    async fn test_writes_session_json() {
        let dir = tempfile::tempdir().unwrap();
        let archive = JsonFileArchive::new(dir.path().join("sessions"));
        let session = InterviewSession::new(
            CompanyProfile {
                name: "Acme".into(),
                organization_type: "startup".into(),
                role: "SRE".into(),
                seniority: "junior".into(),
            },
            CandidateProfile {
                name: "Kai".into(),
                resume_text: "Kai".into(),
            },
            InterviewKind::Hr,
        );
        let id = session.id().to_string();
        let record = InterviewRecord {
            session,
            summary_text: "Strong communicator.".into(),
            finalized_at: Utc::now(),
        };

        archive.store(&record).await.unwrap();

        let raw = std::fs::read_to_string(archive.path_for(&id)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["summaryText"], "Strong communicator.");
        assert_eq!(value["session"]["id"], id.as_str());
        assert_eq!(value["session"]["kind"], "hr");
    }
}
