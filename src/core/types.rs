// src/core/types.rs — Core domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interview format, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewKind {
    Dsa,
    ResumeCs,
    TechnicalHr,
    Hr,
}

impl InterviewKind {
    pub const ALL: [InterviewKind; 4] = [
        InterviewKind::Dsa,
        InterviewKind::ResumeCs,
        InterviewKind::TechnicalHr,
        InterviewKind::Hr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewKind::Dsa => "dsa",
            InterviewKind::ResumeCs => "resume_cs",
            InterviewKind::TechnicalHr => "technical_hr",
            InterviewKind::Hr => "hr",
        }
    }

    /// Kinds that carry a coding problem set.
    pub fn uses_coding(&self) -> bool {
        !matches!(self, InterviewKind::Hr)
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            InterviewKind::Dsa => "data structures and algorithms",
            InterviewKind::ResumeCs => "resume and computer science fundamentals",
            InterviewKind::TechnicalHr => "technical and behavioral",
            InterviewKind::Hr => "behavioral (HR)",
        }
    }
}

impl fmt::Display for InterviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dsa" => Ok(InterviewKind::Dsa),
            "resume_cs" | "resume" => Ok(InterviewKind::ResumeCs),
            "technical_hr" | "technical" => Ok(InterviewKind::TechnicalHr),
            "hr" | "behavioral" => Ok(InterviewKind::Hr),
            other => Err(format!(
                "unknown interview kind '{other}' (expected dsa, resume_cs, technical_hr, hr)"
            )),
        }
    }
}

/// State-machine phase. Ordering follows declaration order, which is the
/// order phases may appear in across all kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Introduction,
    ProblemSolving,
    ResumeDiscussion,
    TechnicalFundamentals,
    TechnicalAssessment,
    BehavioralAssessment,
    CulturalFit,
    WrapUp,
    Terminated,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::ProblemSolving => "problem_solving",
            Phase::ResumeDiscussion => "resume_discussion",
            Phase::TechnicalFundamentals => "technical_fundamentals",
            Phase::TechnicalAssessment => "technical_assessment",
            Phase::BehavioralAssessment => "behavioral_assessment",
            Phase::CulturalFit => "cultural_fit",
            Phase::WrapUp => "wrap_up",
            Phase::Terminated => "terminated",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub organization_type: String,
    pub role: String,
    pub seniority: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub name: String,
    pub resume_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleCase {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaProblem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub topics: Vec<String>,
    #[serde(default)]
    pub input_format: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub samples: Vec<SampleCase>,
}

impl DsaProblem {
    /// Grouping key for balanced selection.
    pub fn primary_topic(&self) -> &str {
        self.topics.first().map(String::as_str).unwrap_or("general")
    }
}

/// Six-dimension prosody score for one spoken answer. Each value is in [1, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneVector {
    pub confidence: f32,
    pub stress: f32,
    pub engagement: f32,
    pub clarity: f32,
    pub pace: f32,
    pub volume: f32,
}

impl ToneVector {
    /// Substituted when prosody analysis fails.
    pub const NEUTRAL: ToneVector = ToneVector {
        confidence: 7.0,
        stress: 3.0,
        engagement: 8.0,
        clarity: 8.0,
        pace: 7.0,
        volume: 8.0,
    };

    /// Force every dimension into [1, 10]. Non-finite values become the neutral value.
    pub fn clamped(self) -> Self {
        fn clamp(v: f32, neutral: f32) -> f32 {
            if v.is_finite() {
                v.clamp(1.0, 10.0)
            } else {
                neutral
            }
        }
        let n = Self::NEUTRAL;
        Self {
            confidence: clamp(self.confidence, n.confidence),
            stress: clamp(self.stress, n.stress),
            engagement: clamp(self.engagement, n.engagement),
            clarity: clamp(self.clarity, n.clarity),
            pace: clamp(self.pace, n.pace),
            volume: clamp(self.volume, n.volume),
        }
    }
}

impl fmt::Display for ToneVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "confidence {:.1}, stress {:.1}, engagement {:.1}, clarity {:.1}, pace {:.1}, volume {:.1}",
            self.confidence, self.stress, self.engagement, self.clarity, self.pace, self.volume
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub round: u32,
    pub text: String,
    pub phase: Phase,
    pub asked_at: DateTime<Utc>,
}

/// What the evaluation policy recommends after a code submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    AdvanceToNextProblem,
    RequestFollowUp,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AdvanceToNextProblem => "advanceToNextProblem",
            Action::RequestFollowUp => "requestFollowUp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAction {
    pub action: Action,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEvaluation {
    /// 0..=50
    pub score: u8,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub problem_title: String,
    pub language: String,
    pub evaluated_at: DateTime<Utc>,
}

/// New information handed to the state machine on each `advance`.
#[derive(Debug, Clone)]
pub enum Evidence {
    /// A spoken (or typed) answer. Typed answers carry no tone sample.
    Answer {
        transcript: String,
        tone: Option<ToneVector>,
    },
    /// A code submission and its evaluation.
    Code {
        code: String,
        evaluation: CodeEvaluation,
        next_action: NextAction,
    },
}

/// Structured directives recovered from a language-model reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReply {
    pub question: String,
    pub feedback: Option<serde_json::Value>,
    pub should_move_to_next_problem: bool,
    pub is_wrap_up: bool,
    #[serde(rename = "showDSAProblem")]
    pub show_dsa_problem: bool,
    pub show_coding_problem: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("dsa".parse::<InterviewKind>().unwrap(), InterviewKind::Dsa);
        assert_eq!(
            "resume-cs".parse::<InterviewKind>().unwrap(),
            InterviewKind::ResumeCs
        );
        assert_eq!(
            "Technical_HR".parse::<InterviewKind>().unwrap(),
            InterviewKind::TechnicalHr
        );
        assert!("pairing".parse::<InterviewKind>().is_err());
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&InterviewKind::TechnicalHr).unwrap();
        assert_eq!(json, "\"technical_hr\"");
        let back: InterviewKind = serde_json::from_str("\"resume_cs\"").unwrap();
        assert_eq!(back, InterviewKind::ResumeCs);
    }

    #[test]
    fn test_hr_has_no_coding() {
        assert!(!InterviewKind::Hr.uses_coding());
        assert!(InterviewKind::Dsa.uses_coding());
        assert!(InterviewKind::ResumeCs.uses_coding());
    }

    #[test]
    fn test_phase_order_ends_with_wrap_up_then_terminated() {
        assert!(Phase::Introduction < Phase::ProblemSolving);
        assert!(Phase::CulturalFit < Phase::WrapUp);
        assert!(Phase::WrapUp < Phase::Terminated);
    }

    #[test]
    fn test_tone_clamped() {
        let t = ToneVector {
            confidence: 0.0,
            stress: 12.0,
            engagement: f32::NAN,
            clarity: 5.5,
            pace: 1.0,
            volume: 10.0,
        }
        .clamped();
        assert_eq!(t.confidence, 1.0);
        assert_eq!(t.stress, 10.0);
        assert_eq!(t.engagement, ToneVector::NEUTRAL.engagement);
        assert_eq!(t.clarity, 5.5);
    }

    #[test]
    fn test_action_wire_names() {
        let json = serde_json::to_string(&Action::AdvanceToNextProblem).unwrap();
        assert_eq!(json, "\"advanceToNextProblem\"");
        assert_eq!(Action::RequestFollowUp.as_str(), "requestFollowUp");
    }
}
