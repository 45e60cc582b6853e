// src/evaluator/mod.rs — Code evaluation engine

pub mod judge;
pub mod parser;

use chrono::Utc;

use crate::core::types::{Action, CodeEvaluation, DsaProblem, NextAction};
use crate::gateway::LanguageModelGateway;
use crate::infra::errors::InterviewError;

/// Minimum score (inclusive) that moves the candidate to the next problem.
pub const ADVANCE_THRESHOLD: u8 = 35;
/// Below this score the follow-up is framed as a fundamentals review.
pub const STRUGGLING_THRESHOLD: u8 = 20;

/// Scores submissions against a rubric using the language model.
pub struct CodeEvaluator {
    gateway: LanguageModelGateway,
}

impl CodeEvaluator {
    pub fn new(gateway: LanguageModelGateway) -> Self {
        Self { gateway }
    }

    /// Evaluate one submission. Only a transport failure of the gateway is an
    /// error; malformed replies degrade inside the parser.
    pub async fn evaluate(
        &self,
        code: &str,
        problem: &DsaProblem,
        language: &str,
    ) -> Result<CodeEvaluation, InterviewError> {
        let prompt = judge::rubric_prompt(problem, code, language);
        let raw = self.gateway.ask_text(&prompt).await?;
        let parsed = parser::parse_evaluation(&raw);

        tracing::info!(
            problem = %problem.id,
            language,
            score = parsed.score,
            recovery = ?parsed.recovery,
            "Code evaluated"
        );

        Ok(CodeEvaluation {
            score: parsed.score,
            overall_feedback: parsed.overall_feedback,
            strengths: parsed.strengths,
            weaknesses: parsed.weaknesses,
            problem_title: problem.title.clone(),
            language: language.to_string(),
            evaluated_at: Utc::now(),
        })
    }
}

/// Threshold policy over a 0–50 score.
pub fn next_action(score: u8) -> NextAction {
    if score >= ADVANCE_THRESHOLD {
        NextAction {
            action: Action::AdvanceToNextProblem,
            rationale: "Solution meets the bar; move on to the next problem.".into(),
        }
    } else if score >= STRUGGLING_THRESHOLD {
        NextAction {
            action: Action::RequestFollowUp,
            rationale: "Partially correct; ask follow-up questions to close the gaps.".into(),
        }
    } else {
        NextAction {
            action: Action::RequestFollowUp,
            rationale: "Significant issues; revisit the approach and fundamentals before moving on."
                .into(),
        }
    }
}
