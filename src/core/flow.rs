// src/core/flow.rs — Interview flow state machine
//
// All time-based decisions go through budget::assess so the wrap-up
// pre-emption applies to every kind. A session is only mutated after the
// model call succeeded; a failed call leaves it exactly as it was.

use std::sync::Arc;

use serde::Serialize;

use super::budget::{self, Clock};
use super::prompts;
use super::session::InterviewSession;
use super::types::*;
use crate::gateway::LanguageModelGateway;
use crate::infra::errors::InterviewError;
use crate::problems::ProblemCatalog;

pub const DEFAULT_PROBLEM_COUNT: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub question: String,
    pub round: u32,
    pub max_duration_minutes: u32,
    pub wrap_up_threshold_minutes: u32,
    pub show_dsa_problem: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOutcome {
    pub question: String,
    pub round: u32,
    pub phase: Phase,
    pub is_wrap_up: bool,
    pub time_expired: bool,
    /// True when the problem index moved forward on this turn.
    pub should_move_to_next_problem: bool,
    pub show_dsa_problem: bool,
    pub show_coding_problem: bool,
    pub elapsed_minutes: u32,
    pub remaining_minutes: u32,
    pub feedback: Option<serde_json::Value>,
}

pub struct InterviewFlow {
    gateway: LanguageModelGateway,
    catalog: Arc<ProblemCatalog>,
    clock: Arc<dyn Clock>,
    problem_count: usize,
}

impl InterviewFlow {
    pub fn new(gateway: LanguageModelGateway, catalog: Arc<ProblemCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway,
            catalog,
            clock,
            problem_count: DEFAULT_PROBLEM_COUNT,
        }
    }

    pub fn with_problem_count(mut self, count: usize) -> Self {
        self.problem_count = count;
        self
    }

    /// Ask the opening question and start the time budget.
    pub async fn start(&self, session: &mut InterviewSession) -> Result<StartOutcome, InterviewError> {
        if session.is_terminated() {
            return Err(InterviewError::not_found(session.id()));
        }
        if session.has_started() {
            return Err(InterviewError::AlreadyStarted {
                id: session.id().to_string(),
            });
        }

        let problems = match session.kind() {
            InterviewKind::Dsa => self.catalog.select_balanced_set(self.problem_count),
            InterviewKind::ResumeCs | InterviewKind::TechnicalHr => {
                self.catalog.select_balanced_set(1)
            }
            InterviewKind::Hr => Vec::new(),
        };

        let reply = self.gateway.ask(&prompts::welcome(session)).await?;
        let now = self.clock.now();

        session.phase = Phase::Introduction;
        session.started_at = Some(now);
        session.round = 0;
        session.question_history.clear();
        session.dsa_problems = problems;
        session.current_problem_index = 0;

        let question = non_empty_question(reply.question, Phase::Introduction);
        let round = session.record_question(question.clone(), now);
        let profile = budget::profile(session.kind());

        tracing::info!(
            session_id = %session.id(),
            kind = %session.kind(),
            problems = session.dsa_problems.len(),
            "Interview started"
        );

        Ok(StartOutcome {
            question,
            round,
            max_duration_minutes: profile.max_minutes,
            wrap_up_threshold_minutes: profile.wrap_up_at,
            show_dsa_problem: reply.show_dsa_problem,
        })
    }

    /// Record new evidence, ask the model for the next question, and apply
    /// the resulting transitions.
    pub async fn advance(
        &self,
        session: &mut InterviewSession,
        evidence: Evidence,
    ) -> Result<AdvanceOutcome, InterviewError> {
        if session.is_terminated() {
            return Err(InterviewError::not_found(session.id()));
        }
        let Some(started_at) = session.started_at() else {
            return Err(InterviewError::NotStarted {
                id: session.id().to_string(),
            });
        };

        let status = budget::assess(session.kind(), started_at, self.clock.now());
        let answers_after = session.responses().len() + 1;
        let scheduled = budget::scheduled_phase(session.kind(), status.elapsed_minutes, answers_after);
        let target = scheduled.max(session.phase());

        let prompt = if target == Phase::WrapUp {
            prompts::wrap_up(session, &evidence, &status)
        } else {
            prompts::continuation(session, target, &evidence, &status)
        };

        let reply = self.gateway.ask(&prompt).await?;

        // Model call succeeded: apply everything in one go.
        let code_says_advance = record_evidence(session, evidence);

        session.enter_phase(target);
        if reply.is_wrap_up {
            session.enter_phase(Phase::WrapUp);
        }

        let wants_move = reply.should_move_to_next_problem || code_says_advance;
        let moved = wants_move && session.kind().uses_coding() && session.advance_problem();

        if reply.show_coding_problem && !session.dsa_problems.is_empty() {
            session.coding_problem_revealed = true;
        }

        let question = non_empty_question(reply.question, session.phase());
        let round = session.record_question(question.clone(), self.clock.now());

        tracing::debug!(
            session_id = %session.id(),
            round,
            phase = %session.phase(),
            elapsed = status.elapsed_minutes,
            moved,
            "Advanced interview"
        );

        Ok(AdvanceOutcome {
            question,
            round,
            phase: session.phase(),
            is_wrap_up: session.phase() == Phase::WrapUp,
            time_expired: status.expired,
            should_move_to_next_problem: moved,
            show_dsa_problem: reply.show_dsa_problem,
            show_coding_problem: reply.show_coding_problem,
            elapsed_minutes: status.elapsed_minutes,
            remaining_minutes: status.remaining_minutes,
            feedback: reply.feedback,
        })
    }
}

/// Append the evidence to the session. Returns true when a code evaluation
/// recommends moving to the next problem.
fn record_evidence(session: &mut InterviewSession, evidence: Evidence) -> bool {
    match evidence {
        Evidence::Answer { transcript, tone } => {
            session.responses.push(transcript);
            if let Some(tone) = tone {
                session.tone_history.push(tone);
            }
            false
        }
        Evidence::Code {
            code,
            evaluation,
            next_action,
        } => {
            session.responses.push(format!(
                "[Submitted {} solution for \"{}\" ({} lines), scored {}/50]",
                evaluation.language,
                evaluation.problem_title,
                code.lines().count(),
                evaluation.score
            ));
            session.evaluations.push(evaluation);
            session.coding_problem_revealed = true;
            next_action.action == Action::AdvanceToNextProblem
        }
    }
}

fn non_empty_question(question: String, phase: Phase) -> String {
    if !question.trim().is_empty() {
        return question;
    }
    tracing::warn!(%phase, "Model reply had no question, using fallback");
    fallback_question(phase).to_string()
}

fn fallback_question(phase: Phase) -> &'static str {
    match phase {
        Phase::Introduction => "Could you start by telling me a little about yourself?",
        Phase::ProblemSolving => "Can you walk me through how you would approach this problem?",
        Phase::ResumeDiscussion => "Tell me more about the project on your resume you are proudest of.",
        Phase::TechnicalFundamentals => "Which data structure would you reach for here, and why?",
        Phase::TechnicalAssessment => "How would you design that differently at ten times the scale?",
        Phase::BehavioralAssessment => {
            "Tell me about a time you disagreed with a teammate. What happened?"
        }
        Phase::CulturalFit => "What kind of team environment helps you do your best work?",
        Phase::WrapUp | Phase::Terminated => {
            "Thank you for your time today. Do you have any questions for me?"
        }
    }
}
