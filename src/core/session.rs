// src/core/session.rs — The interview session aggregate
//
// Fields are crate-private: only the flow state machine and the orchestrator
// mutate a session. Adding a field means bumping SCHEMA_VERSION.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::types::*;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub(crate) id: String,
    pub(crate) schema_version: u32,
    pub(crate) company: CompanyProfile,
    pub(crate) candidate: CandidateProfile,
    pub(crate) kind: InterviewKind,
    pub(crate) phase: Phase,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) round: u32,
    pub(crate) question_history: Vec<QuestionRecord>,
    pub(crate) responses: Vec<String>,
    pub(crate) tone_history: Vec<ToneVector>,
    pub(crate) dsa_problems: Vec<DsaProblem>,
    pub(crate) current_problem_index: usize,
    pub(crate) evaluations: Vec<CodeEvaluation>,
    /// Set once the model asks for the coding problem to be shown.
    pub(crate) coding_problem_revealed: bool,
}

impl InterviewSession {
    pub fn new(company: CompanyProfile, candidate: CandidateProfile, kind: InterviewKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            schema_version: SCHEMA_VERSION,
            company,
            candidate,
            kind,
            phase: Phase::Introduction,
            created_at: Utc::now(),
            started_at: None,
            round: 0,
            question_history: Vec::new(),
            responses: Vec::new(),
            tone_history: Vec::new(),
            dsa_problems: Vec::new(),
            current_problem_index: 0,
            evaluations: Vec::new(),
            coding_problem_revealed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> InterviewKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    pub fn candidate(&self) -> &CandidateProfile {
        &self.candidate
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn question_history(&self) -> &[QuestionRecord] {
        &self.question_history
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn tone_history(&self) -> &[ToneVector] {
        &self.tone_history
    }

    pub fn dsa_problems(&self) -> &[DsaProblem] {
        &self.dsa_problems
    }

    pub fn current_problem_index(&self) -> usize {
        self.current_problem_index
    }

    pub fn evaluations(&self) -> &[CodeEvaluation] {
        &self.evaluations
    }

    pub fn coding_problem_revealed(&self) -> bool {
        self.coding_problem_revealed
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    pub fn last_question(&self) -> Option<&QuestionRecord> {
        self.question_history.last()
    }

    pub fn current_problem(&self) -> Option<&DsaProblem> {
        self.dsa_problems.get(self.current_problem_index)
    }

    pub fn is_last_problem(&self) -> bool {
        !self.dsa_problems.is_empty() && self.current_problem_index + 1 >= self.dsa_problems.len()
    }

    /// Append a question and bump the round so `round == question_history.len()`.
    pub(crate) fn record_question(&mut self, text: String, at: DateTime<Utc>) -> u32 {
        self.round += 1;
        self.question_history.push(QuestionRecord {
            round: self.round,
            text,
            phase: self.phase,
            asked_at: at,
        });
        self.round
    }

    /// Move to the next problem. Past the last index this is a no-op.
    pub(crate) fn advance_problem(&mut self) -> bool {
        if self.current_problem_index + 1 < self.dsa_problems.len() {
            self.current_problem_index += 1;
            true
        } else {
            tracing::debug!(
                session_id = %self.id,
                index = self.current_problem_index,
                total = self.dsa_problems.len(),
                "Problem index exhausted, ignoring move request"
            );
            false
        }
    }

    /// Move the phase forward. Requests to move backward are ignored.
    pub(crate) fn enter_phase(&mut self, phase: Phase) -> bool {
        if phase > self.phase {
            tracing::info!(
                session_id = %self.id,
                from = %self.phase,
                to = %phase,
                "Phase transition"
            );
            self.phase = phase;
            true
        } else {
            false
        }
    }
}
