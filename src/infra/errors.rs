// src/infra/errors.rs — Error types for the interview orchestrator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterviewError {
    // Validation errors (reported before any gateway call)
    #[error("Session '{id}' not found")]
    SessionNotFound { id: String },

    #[error("Session '{id}' already exists")]
    DuplicateSession { id: String },

    #[error("Session '{id}' has already been started")]
    AlreadyStarted { id: String },

    #[error("Session '{id}' has not been started")]
    NotStarted { id: String },

    #[error("Session '{id}' has no recorded questions to summarize")]
    EmptyInterview { id: String },

    #[error("Invalid audio payload: {reason}")]
    InvalidAudioPayload { reason: String },

    #[error("Session '{id}' has no active coding problem")]
    NoCodingProblem { id: String },

    // Gateway errors
    #[error("Gateway '{gateway}' failed: {message}")]
    GatewayTransport { gateway: String, message: String },

    #[error("Gateway '{gateway}' timed out after {secs}s")]
    GatewayTimeout { gateway: String, secs: u64 },

    /// Only produced by strict decoders; the reply parsers recover from it.
    #[error("Malformed gateway reply: {reason}")]
    MalformedGatewayReply { reason: String },

    // Inputs and infra
    #[error("Problem catalog error: {0}")]
    Catalog(String),

    #[error("Resume extraction failed: {0}")]
    Resume(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InterviewError {
    pub fn transport(gateway: &str, message: impl Into<String>) -> Self {
        InterviewError::GatewayTransport {
            gateway: gateway.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(id: &str) -> Self {
        InterviewError::SessionNotFound { id: id.to_string() }
    }

    /// True for network, auth, and timeout failures of an external gateway.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            InterviewError::GatewayTransport { .. } | InterviewError::GatewayTimeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, InterviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(InterviewError::transport("llm", "connection reset").is_transport());
        assert!(InterviewError::GatewayTimeout {
            gateway: "transcription".into(),
            secs: 30
        }
        .is_transport());
        assert!(!InterviewError::not_found("abc").is_transport());
        assert!(!InterviewError::EmptyInterview { id: "abc".into() }.is_transport());
    }

    #[test]
    fn test_not_found_message_names_id() {
        let e = InterviewError::not_found("sess-42");
        assert_eq!(e.to_string(), "Session 'sess-42' not found");
    }
}
