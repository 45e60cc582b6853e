// src/core/orchestrator.rs — Interview orchestrator façade
//
// Every operation looks the session up first and reports SessionNotFound
// verbatim. The per-session lock is held for the whole operation, gateway
// calls included, so two requests for one session never interleave.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::audio::AudioIngest;
use super::budget::SystemClock;
use super::flow::InterviewFlow;
use super::prompts;
use super::session::InterviewSession;
use super::types::*;
use crate::evaluator::{self, CodeEvaluator};
use crate::gateway::{
    DisabledToneAnalyzer, HttpToneAnalyzer, LanguageModelGateway, ToneAnalyzer, WhisperTranscriber,
};
use crate::infra::archive::{InterviewRecord, JsonFileArchive, TranscriptArchive};
use crate::infra::config::Config;
use crate::infra::errors::InterviewError;
use crate::infra::paths;
use crate::infra::session::{InMemorySessionStore, SessionHandle, SessionStore};
use crate::problems;
use crate::provider::{self, ModelRef};

type Result<T> = std::result::Result<T, InterviewError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInterviewResult {
    pub question: String,
    pub round: u32,
    pub max_duration_minutes: u32,
    pub wrap_up_threshold_minutes: u32,
    #[serde(rename = "showDSAProblem")]
    pub show_dsa_problem: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsa_problems: Option<Vec<DsaProblem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_problems: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub question: String,
    pub round: u32,
    pub phase: Phase,
    pub is_wrap_up: bool,
    pub time_expired: bool,
    pub elapsed_minutes: u32,
    pub remaining_minutes: u32,
    /// What was recorded as the answer (the fallback text when transcription failed).
    pub transcript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<ToneVector>,
    pub should_move_to_next_problem: bool,
    #[serde(rename = "showDSAProblem")]
    pub show_dsa_problem: bool,
    pub show_coding_problem: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_problem: Option<DsaProblem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_problem_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_problems: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub score: u8,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_action: NextAction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSubmissionResult {
    pub evaluation: EvaluationSummary,
    pub next_question: String,
    pub round: u32,
    pub phase: Phase,
    pub is_wrap_up: bool,
    pub current_problem: Option<DsaProblem>,
    pub current_index: usize,
    pub total_problems: usize,
    pub is_last_problem: bool,
    pub should_move_to_next_problem: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResult {
    pub summary_text: String,
    pub total_rounds: u32,
    pub question_count: usize,
    pub response_count: usize,
    pub tone_sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TerminateResult {
    pub ok: bool,
}

pub struct InterviewOrchestrator {
    store: Arc<dyn SessionStore>,
    flow: InterviewFlow,
    audio: AudioIngest,
    evaluator: CodeEvaluator,
    summarizer: LanguageModelGateway,
    archive: Option<Arc<dyn TranscriptArchive>>,
}

impl InterviewOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        flow: InterviewFlow,
        audio: AudioIngest,
        evaluator: CodeEvaluator,
        summarizer: LanguageModelGateway,
    ) -> Self {
        Self {
            store,
            flow,
            audio,
            evaluator,
            summarizer,
            archive: None,
        }
    }

    pub fn with_archive(mut self, archive: Arc<dyn TranscriptArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Wire up real gateways from config and the environment.
    pub fn from_config(config: &Config) -> Result<Self> {
        let interviewer_ref = parse_model_ref(&config.models.interviewer)?;
        let evaluator_ref = parse_model_ref(&config.models.evaluator)?;
        let interviewer = provider::resolve(&interviewer_ref, &config.models)?;
        let evaluator_provider = provider::resolve(&evaluator_ref, &config.models)?;
        let llm_timeout = config.gateways.llm_timeout();

        let question_gateway =
            LanguageModelGateway::new(interviewer.clone(), interviewer_ref.model.clone(), llm_timeout);
        let summarizer = LanguageModelGateway::new(interviewer, interviewer_ref.model, llm_timeout)
            .with_temperature(0.4)
            .with_max_tokens(2048);
        let evaluator_gateway =
            LanguageModelGateway::new(evaluator_provider, evaluator_ref.model, llm_timeout)
                .with_temperature(0.1)
                .with_max_tokens(2000);

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| InterviewError::Config("OPENAI_API_KEY is not set".into()))?;
        let transcriber = match &config.models.base_url {
            Some(url) => WhisperTranscriber::with_base_url(
                api_key,
                config.gateways.transcription_model.clone(),
                url.clone(),
            ),
            None => WhisperTranscriber::new(api_key, config.gateways.transcription_model.clone()),
        };
        let analyzer: Arc<dyn ToneAnalyzer> = match &config.gateways.prosody_url {
            Some(url) => Arc::new(HttpToneAnalyzer::new(url.clone())),
            None => {
                tracing::info!("No prosody endpoint configured, tone will be neutral");
                Arc::new(DisabledToneAnalyzer)
            }
        };
        let audio = AudioIngest::new(Arc::new(transcriber), analyzer)
            .with_timeouts(
                config.gateways.transcription_timeout(),
                config.gateways.prosody_timeout(),
            )
            .with_max_bytes(config.interview.max_audio_bytes);

        let catalog = Arc::new(problems::load_configured(&config.interview)?);
        let flow = InterviewFlow::new(question_gateway, catalog, Arc::new(SystemClock))
            .with_problem_count(config.interview.dsa_problem_count);

        let mut orchestrator = Self::new(
            Arc::new(InMemorySessionStore::new()),
            flow,
            audio,
            CodeEvaluator::new(evaluator_gateway),
            summarizer,
        );
        if config.interview.archive_transcripts {
            orchestrator = orchestrator.with_archive(Arc::new(JsonFileArchive::new(paths::sessions_dir())));
        }
        Ok(orchestrator)
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Register a new session. It asks nothing until `start_interview`.
    pub fn create_session(
        &self,
        company: CompanyProfile,
        candidate: CandidateProfile,
        kind: InterviewKind,
    ) -> Result<String> {
        let session = InterviewSession::new(company, candidate, kind);
        let id = session.id().to_string();
        self.store.create(&id, session)?;
        tracing::info!(session_id = %id, %kind, "Session created");
        Ok(id)
    }

    /// Copy of the session as it stands now.
    pub async fn snapshot(&self, session_id: &str) -> Result<InterviewSession> {
        let handle = self.handle(session_id)?;
        let session = handle.lock().await;
        if session.is_terminated() {
            return Err(InterviewError::not_found(session_id));
        }
        Ok(session.clone())
    }

    pub async fn start_interview(&self, session_id: &str) -> Result<StartInterviewResult> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        let outcome = self.flow.start(&mut session).await?;

        let (dsa_problems, total_problems) = if session.kind() == InterviewKind::Dsa {
            (
                Some(session.dsa_problems().to_vec()),
                Some(session.dsa_problems().len()),
            )
        } else {
            (None, None)
        };

        Ok(StartInterviewResult {
            question: outcome.question,
            round: outcome.round,
            max_duration_minutes: outcome.max_duration_minutes,
            wrap_up_threshold_minutes: outcome.wrap_up_threshold_minutes,
            show_dsa_problem: outcome.show_dsa_problem,
            dsa_problems,
            total_problems,
        })
    }

    /// Spoken answer: transcribe and analyze concurrently, then advance.
    pub async fn submit_answer(&self, session_id: &str, audio: &[u8]) -> Result<AnswerResult> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        ensure_live(&session)?;

        let ingested = self.audio.ingest(audio).await?;
        let transcript = ingested.transcript.clone();
        let evidence = Evidence::Answer {
            transcript: ingested.transcript,
            tone: Some(ingested.tone),
        };
        self.answer(&mut session, evidence, transcript, Some(ingested.tone))
            .await
    }

    /// Typed answer. No tone sample is recorded.
    pub async fn submit_transcript(&self, session_id: &str, text: &str) -> Result<AnswerResult> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        ensure_live(&session)?;

        let evidence = Evidence::Answer {
            transcript: text.to_string(),
            tone: None,
        };
        self.answer(&mut session, evidence, text.to_string(), None).await
    }

    pub async fn submit_code(
        &self,
        session_id: &str,
        code: &str,
        language: &str,
    ) -> Result<CodeSubmissionResult> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        ensure_live(&session)?;

        let problem = session
            .current_problem()
            .cloned()
            .ok_or_else(|| InterviewError::NoCodingProblem {
                id: session_id.to_string(),
            })?;

        let evaluation = self.evaluator.evaluate(code, &problem, language).await?;
        let next_action = evaluator::next_action(evaluation.score);
        let summary = EvaluationSummary {
            score: evaluation.score,
            overall_feedback: evaluation.overall_feedback.clone(),
            strengths: evaluation.strengths.clone(),
            weaknesses: evaluation.weaknesses.clone(),
            next_action: next_action.clone(),
        };

        let outcome = self
            .flow
            .advance(
                &mut session,
                Evidence::Code {
                    code: code.to_string(),
                    evaluation,
                    next_action,
                },
            )
            .await?;

        Ok(CodeSubmissionResult {
            evaluation: summary,
            next_question: outcome.question,
            round: outcome.round,
            phase: outcome.phase,
            is_wrap_up: outcome.is_wrap_up,
            current_problem: session.current_problem().cloned(),
            current_index: session.current_problem_index(),
            total_problems: session.dsa_problems().len(),
            is_last_problem: session.is_last_problem(),
            should_move_to_next_problem: outcome.should_move_to_next_problem,
        })
    }

    /// Summarize the interview, archive it, and drop the session.
    ///
    /// On any error the session stays in the store.
    pub async fn finalize(&self, session_id: &str) -> Result<FinalizeResult> {
        let handle = self.handle(session_id)?;
        let mut session = handle.lock().await;
        if session.is_terminated() {
            return Err(InterviewError::not_found(session_id));
        }
        if session.question_history().is_empty() {
            return Err(InterviewError::EmptyInterview {
                id: session_id.to_string(),
            });
        }

        let summary_text = self.summarizer.ask_text(&prompts::summary(&session)).await?;

        let result = FinalizeResult {
            summary_text: summary_text.trim().to_string(),
            total_rounds: session.round(),
            question_count: session.question_history().len(),
            response_count: session.responses().len(),
            tone_sample_count: session.tone_history().len(),
        };

        if let Some(archive) = &self.archive {
            let record = InterviewRecord {
                session: session.clone(),
                summary_text: result.summary_text.clone(),
                finalized_at: Utc::now(),
            };
            if let Err(e) = archive.store(&record).await {
                tracing::warn!(session_id, error = %e, "Failed to archive transcript");
            }
        }

        session.phase = Phase::Terminated;
        self.store.delete(session_id);
        tracing::info!(
            session_id,
            rounds = result.total_rounds,
            "Interview finalized"
        );
        Ok(result)
    }

    /// Drop the session. Unknown ids are not an error.
    ///
    /// An in-flight request keeps its own handle and finishes; the session is
    /// just no longer reachable.
    pub fn terminate(&self, session_id: &str) -> TerminateResult {
        match self.store.delete(session_id) {
            Some(handle) => {
                if let Ok(mut session) = handle.try_lock() {
                    session.phase = Phase::Terminated;
                }
                tracing::info!(session_id, "Session terminated");
            }
            None => tracing::debug!(session_id, "Terminate on unknown session"),
        }
        TerminateResult { ok: true }
    }

    fn handle(&self, session_id: &str) -> Result<SessionHandle> {
        self.store
            .get(session_id)
            .ok_or_else(|| InterviewError::not_found(session_id))
    }

    async fn answer(
        &self,
        session: &mut InterviewSession,
        evidence: Evidence,
        transcript: String,
        tone: Option<ToneVector>,
    ) -> Result<AnswerResult> {
        let outcome = self.flow.advance(session, evidence).await?;

        let problem_visible = match session.kind() {
            InterviewKind::Dsa => true,
            InterviewKind::ResumeCs | InterviewKind::TechnicalHr => session.coding_problem_revealed(),
            InterviewKind::Hr => false,
        };
        let (current_problem, current_problem_index, total_problems) =
            if problem_visible && !session.dsa_problems().is_empty() {
                (
                    session.current_problem().cloned(),
                    Some(session.current_problem_index()),
                    Some(session.dsa_problems().len()),
                )
            } else {
                (None, None, None)
            };

        Ok(AnswerResult {
            question: outcome.question,
            round: outcome.round,
            phase: outcome.phase,
            is_wrap_up: outcome.is_wrap_up,
            time_expired: outcome.time_expired,
            elapsed_minutes: outcome.elapsed_minutes,
            remaining_minutes: outcome.remaining_minutes,
            transcript,
            tone,
            should_move_to_next_problem: outcome.should_move_to_next_problem,
            show_dsa_problem: outcome.show_dsa_problem,
            show_coding_problem: outcome.show_coding_problem,
            current_problem,
            current_problem_index,
            total_problems,
        })
    }
}

/// Checks that run before any gateway call on an existing session.
fn ensure_live(session: &InterviewSession) -> Result<()> {
    if session.is_terminated() {
        return Err(InterviewError::not_found(session.id()));
    }
    if !session.has_started() {
        return Err(InterviewError::NotStarted {
            id: session.id().to_string(),
        });
    }
    Ok(())
}

fn parse_model_ref(raw: &str) -> Result<ModelRef> {
    ModelRef::parse(raw).ok_or_else(|| {
        InterviewError::Config(format!("Invalid model reference '{raw}', expected provider/model"))
    })
}
