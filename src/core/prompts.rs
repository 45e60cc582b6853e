// src/core/prompts.rs — Prompt builders for each interview turn
//
// Every structured prompt ends with the same JSON reply contract so the reply
// parser sees a consistent field set regardless of kind or phase.

use super::budget::{self, BudgetStatus};
use super::session::InterviewSession;
use super::types::{DsaProblem, Evidence, InterviewKind, Phase};

/// Rounds after which resume_cs / technical_hr sessions bring in the coding problem.
pub const CODING_PROBLEM_MIN_ROUND: u32 = 3;
pub const CODING_PROBLEM_MAX_ROUND: u32 = 5;

const REPLY_CONTRACT: &str = "Respond with a single JSON object and nothing else:\n\
{\n  \"question\": \"<what you say to the candidate next>\",\n  \
\"feedback\": {\"notes\": \"<optional private notes>\"},\n  \
\"shouldMoveToNextProblem\": false,\n  \
\"showDSAProblem\": false,\n  \
\"showCodingProblem\": false,\n  \
\"isWrapUp\": false\n}\n";

/// Opening turn: greet the candidate and ask the first question.
pub fn welcome(session: &InterviewSession) -> String {
    let mut prompt = String::with_capacity(2048);
    let profile = budget::profile(session.kind());

    append_context_section(&mut prompt, session);

    prompt.push_str("# Your task\n\n");
    prompt.push_str(&format!(
        "Open a {} interview planned for {} minutes. Greet {} by name, introduce \
         yourself as the interviewer from {}, and briefly explain the format.\n",
        session.kind().label(),
        profile.max_minutes,
        session.candidate().name,
        session.company().name,
    ));
    prompt.push_str(match session.kind() {
        InterviewKind::Dsa => {
            "Explain that the session covers data-structure and algorithm problems \
             solved while talking through the approach. Ask the candidate to introduce \
             themselves in a sentence or two before the first problem is shown.\n"
        }
        InterviewKind::ResumeCs => {
            "Explain that you will walk through their resume and then probe \
             computer-science fundamentals. Ask them to summarize their background.\n"
        }
        InterviewKind::TechnicalHr => {
            "Explain that the conversation mixes technical assessment with behavioral \
             questions. Ask them to describe their current role.\n"
        }
        InterviewKind::Hr => {
            "Explain that the conversation is behavioral and about team fit. \
             Ask them what drew them to this role.\n"
        }
    });
    prompt.push('\n');

    append_reply_contract(&mut prompt);
    prompt
}

/// Regular turn: react to the latest evidence and ask the next question.
///
/// `phase` is the phase the session is moving into this turn.
pub fn continuation(
    session: &InterviewSession,
    phase: Phase,
    evidence: &Evidence,
    status: &BudgetStatus,
) -> String {
    let mut prompt = String::with_capacity(4096);

    append_context_section(&mut prompt, session);
    append_progress_section(&mut prompt, session, phase, status);
    append_exchange_section(&mut prompt, session, evidence);

    prompt.push_str("# Guidance\n\n");
    match session.kind() {
        InterviewKind::Dsa => append_dsa_guidance(&mut prompt, session.current_problem()),
        InterviewKind::ResumeCs | InterviewKind::TechnicalHr => {
            append_coding_round_guidance(&mut prompt, session, phase)
        }
        InterviewKind::Hr => prompt.push_str(
            "This is a behavioral interview only; do not ask technical or coding \
             questions. Frame questions around the STAR method (Situation, Task, \
             Action, Result) and follow up when an answer skips one of those parts.\n",
        ),
    }
    prompt.push_str(
        "Ask exactly one question. Keep it short enough to say aloud.\n\n",
    );

    append_reply_contract(&mut prompt);
    prompt
}

/// Closing turn once the time budget reaches the wrap-up threshold.
pub fn wrap_up(session: &InterviewSession, evidence: &Evidence, status: &BudgetStatus) -> String {
    let mut prompt = String::with_capacity(2048);

    append_context_section(&mut prompt, session);
    append_progress_section(&mut prompt, session, Phase::WrapUp, status);
    append_exchange_section(&mut prompt, session, evidence);

    prompt.push_str("# Your task\n\n");
    prompt.push_str(&format!(
        "Time is nearly up. Briefly acknowledge the last answer, thank {} for their \
         time, and invite them to ask any questions they have about {} or the role. \
         Do not start a new topic. Set \"isWrapUp\" to true.\n\n",
        session.candidate().name,
        session.company().name,
    ));

    append_reply_contract(&mut prompt);
    prompt
}

/// Free-text end-of-interview report over the whole transcript.
pub fn summary(session: &InterviewSession) -> String {
    let mut prompt = String::with_capacity(8192);

    append_context_section(&mut prompt, session);

    prompt.push_str("# Transcript\n\n");
    for record in session.question_history() {
        let idx = (record.round as usize).saturating_sub(1);
        prompt.push_str(&format!("Q{} [{}]: {}\n", record.round, record.phase, record.text));
        match session.responses().get(idx) {
            Some(answer) => prompt.push_str(&format!("A{}: {}\n", record.round, answer)),
            None => prompt.push_str(&format!("A{}: (no answer)\n", record.round)),
        }
    }
    prompt.push('\n');

    if !session.tone_history().is_empty() {
        prompt.push_str("# Voice tone samples (1-10)\n\n");
        for (i, tone) in session.tone_history().iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, tone));
        }
        prompt.push('\n');
    }

    if !session.evaluations().is_empty() {
        prompt.push_str("# Code evaluations (0-50)\n\n");
        for eval in session.evaluations() {
            prompt.push_str(&format!(
                "- {} ({}): {}/50. {}\n",
                eval.problem_title, eval.language, eval.score, eval.overall_feedback
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "# Your task\n\n\
         Write a candid interview report in plain prose (no JSON). Cover overall \
         impression, technical ability, communication and confidence as reflected \
         in the tone samples, notable strengths, areas to improve, and a hiring \
         recommendation for the role.\n",
    );
    prompt
}

// ─── Section builders ───────────────────────────────────────────────────────

fn append_context_section(prompt: &mut String, session: &InterviewSession) {
    let company = session.company();
    prompt.push_str("# Interview context\n\n");
    prompt.push_str(&format!("Company: {} ({})\n", company.name, company.organization_type));
    prompt.push_str(&format!("Role: {} ({})\n", company.role, company.seniority));
    prompt.push_str(&format!("Candidate: {}\n", session.candidate().name));
    prompt.push_str(&format!("Interview type: {}\n\n", session.kind().label()));

    let resume = session.candidate().resume_text.trim();
    if !resume.is_empty() && session.kind() != InterviewKind::Dsa {
        prompt.push_str("## Resume\n\n");
        prompt.push_str(crate::util::clip(resume, 4000));
        prompt.push_str("\n\n");
    }
}

fn append_progress_section(
    prompt: &mut String,
    session: &InterviewSession,
    phase: Phase,
    status: &BudgetStatus,
) {
    prompt.push_str("# Progress\n\n");
    prompt.push_str(&format!("Current phase: {}\n", phase));
    prompt.push_str(&format!("Round: {}\n", session.round() + 1));
    prompt.push_str(&format!(
        "Elapsed: {} min, remaining: {} min\n\n",
        status.elapsed_minutes, status.remaining_minutes
    ));
}

fn append_exchange_section(prompt: &mut String, session: &InterviewSession, evidence: &Evidence) {
    prompt.push_str("# Latest exchange\n\n");
    if let Some(last) = session.last_question() {
        prompt.push_str(&format!("You asked: {}\n", last.text));
    }
    match evidence {
        Evidence::Answer { transcript, tone } => {
            prompt.push_str(&format!("Candidate answered: {}\n", transcript));
            if let Some(tone) = tone {
                prompt.push_str(&format!("Voice tone: {}\n", tone));
            }
        }
        Evidence::Code {
            code,
            evaluation,
            next_action,
        } => {
            prompt.push_str(&format!(
                "Candidate submitted {} code for \"{}\":\n```\n{}\n```\n",
                evaluation.language,
                evaluation.problem_title,
                crate::util::clip(code, 3000)
            ));
            prompt.push_str(&format!(
                "Evaluation: {}/50. {}\n",
                evaluation.score, evaluation.overall_feedback
            ));
            if !evaluation.weaknesses.is_empty() {
                prompt.push_str(&format!("Weaknesses: {}\n", evaluation.weaknesses.join("; ")));
            }
            prompt.push_str(&format!(
                "Recommended next step: {} ({})\n",
                next_action.action.as_str(),
                next_action.rationale
            ));
        }
    }
    prompt.push('\n');
}

fn append_dsa_guidance(prompt: &mut String, problem: Option<&DsaProblem>) {
    if let Some(p) = problem {
        prompt.push_str(&format!(
            "Current problem: {} ({}, {})\n{}\n\n",
            p.title,
            p.difficulty,
            p.topics.join(", "),
            p.description
        ));
    }
    prompt.push_str(
        "Discuss the candidate's approach, its time and space complexity, and edge \
         cases. Give hints rather than answers. Set \"shouldMoveToNextProblem\" to \
         true only once the discussion of this problem is substantively complete. \
         Set \"showDSAProblem\" to true when the candidate should see the problem \
         statement.\n",
    );
}

fn append_coding_round_guidance(prompt: &mut String, session: &InterviewSession, phase: Phase) {
    let focus = match phase {
        Phase::ResumeDiscussion => "Dig into projects and decisions from the resume.",
        Phase::TechnicalFundamentals => {
            "Probe computer-science fundamentals: data structures, operating systems, \
             networking, databases."
        }
        Phase::TechnicalAssessment => "Assess practical technical depth for the role.",
        Phase::BehavioralAssessment => "Ask behavioral questions about teamwork and ownership.",
        _ => "Build on the candidate's introduction.",
    };
    prompt.push_str(focus);
    prompt.push('\n');

    if session.coding_problem_revealed {
        prompt.push_str(
            "The coding problem has already been shown; discuss the candidate's \
             solution when relevant.\n",
        );
    } else if let Some(p) = session.current_problem() {
        prompt.push_str(&format!(
            "After round {} and no later than round {}, introduce the coding problem \
             \"{}\" by setting \"showCodingProblem\" to true and asking the candidate \
             to solve it.\n",
            CODING_PROBLEM_MIN_ROUND, CODING_PROBLEM_MAX_ROUND, p.title
        ));
    }
}

fn append_reply_contract(prompt: &mut String) {
    prompt.push_str("# Reply format\n\n");
    prompt.push_str(REPLY_CONTRACT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CandidateProfile, CompanyProfile, ToneVector};
    use chrono::Utc;

    fn session(kind: InterviewKind) -> InterviewSession {
        InterviewSession::new(
            CompanyProfile {
                name: "Acme".into(),
                organization_type: "startup".into(),
                role: "Backend Engineer".into(),
                seniority: "senior".into(),
            },
            CandidateProfile {
                name: "Sam Rivera".into(),
                resume_text: "Sam Rivera\nBuilt payment systems in Rust".into(),
            },
            kind,
        )
    }

    fn status() -> BudgetStatus {
        BudgetStatus {
            elapsed_minutes: 12,
            remaining_minutes: 8,
            wrap_up_due: false,
            expired: false,
        }
    }

    fn answer() -> Evidence {
        Evidence::Answer {
            transcript: "I led the migration".into(),
            tone: Some(ToneVector::NEUTRAL),
        }
    }

    #[test]
    fn test_welcome_names_candidate_and_company() {
        let p = welcome(&session(InterviewKind::ResumeCs));
        assert!(p.contains("Sam Rivera"));
        assert!(p.contains("Acme"));
        assert!(p.contains("20 minutes"));
        assert!(p.contains("\"question\""));
    }

    #[test]
    fn test_hr_continuation_uses_star() {
        let p = continuation(
            &session(InterviewKind::Hr),
            Phase::BehavioralAssessment,
            &answer(),
            &status(),
        );
        assert!(p.contains("STAR"));
        assert!(p.contains("I led the migration"));
        assert!(p.contains("remaining: 8 min"));
    }

    #[test]
    fn test_dsa_continuation_references_current_problem() {
        let mut s = session(InterviewKind::Dsa);
        s.dsa_problems = crate::problems::ProblemCatalog::builtin()
            .unwrap()
            .all()
            .iter()
            .take(2)
            .cloned()
            .collect();
        let title = s.dsa_problems[0].title.clone();
        let p = continuation(&s, Phase::ProblemSolving, &answer(), &status());
        assert!(p.contains(&title));
        assert!(p.contains("shouldMoveToNextProblem"));
    }

    #[test]
    fn test_wrap_up_invites_questions() {
        let mut s = session(InterviewKind::TechnicalHr);
        s.record_question("Tell me about yourself".into(), Utc::now());
        let p = wrap_up(&s, &answer(), &status());
        assert!(p.contains("invite them to ask"));
        assert!(p.contains("You asked: Tell me about yourself"));
    }

    #[test]
    fn test_summary_pairs_questions_with_answers() {
        let mut s = session(InterviewKind::Hr);
        s.record_question("Why Acme?".into(), Utc::now());
        s.responses.push("Mission".into());
        s.record_question("Any conflict?".into(), Utc::now());
        let p = summary(&s);
        assert!(p.contains("Q1 [introduction]: Why Acme?"));
        assert!(p.contains("A1: Mission"));
        assert!(p.contains("A2: (no answer)"));
        assert!(!p.contains("Reply format"));
    }
}
