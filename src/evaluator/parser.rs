// src/evaluator/parser.rs — Parse code-evaluation replies into a score and feedback

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::core::reply::{extract_braced_span, extract_fenced_json};

pub const MAX_SCORE: u8 = 50;
/// Scale midpoint used when nothing could be recovered from the reply.
pub const FALLBACK_SCORE: u8 = 25;
pub const FEEDBACK_UNAVAILABLE: &str =
    "Detailed feedback unavailable: the evaluation could not be parsed.";

/// How much of the reply the parser managed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Structured,
    ScoreOnly,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvaluation {
    pub score: u8,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recovery: Recovery,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    #[serde(deserialize_with = "number_or_numeric_string")]
    score: f64,
    #[serde(default, alias = "overall_feedback", alias = "feedback")]
    overall_feedback: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default, alias = "improvements")]
    weaknesses: Vec<String>,
}

/// Parse an evaluator reply. Never fails: malformed output degrades to a
/// regex-recovered score, then to the midpoint with a fixed message.
///
/// Expected format:
/// ```text
/// {"score": 42, "overallFeedback": "...", "strengths": [...], "weaknesses": [...]}
/// ```
pub fn parse_evaluation(raw: &str) -> ParsedEvaluation {
    let candidates = [
        Some(raw.trim()),
        extract_fenced_json(raw),
        extract_braced_span(raw),
    ];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(parsed) = serde_json::from_str::<RawEvaluation>(candidate) {
            return ParsedEvaluation {
                score: clamp_score(parsed.score),
                overall_feedback: non_empty(parsed.overall_feedback),
                strengths: parsed.strengths,
                weaknesses: parsed.weaknesses,
                recovery: Recovery::Structured,
            };
        }
    }

    if let Some(score) = recover_score(raw) {
        tracing::debug!(score, "Recovered evaluation score from unstructured reply");
        return ParsedEvaluation {
            score,
            overall_feedback: prose_feedback(raw),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            recovery: Recovery::ScoreOnly,
        };
    }

    tracing::warn!(
        snippet = %crate::util::snippet(raw, 120),
        "Evaluation reply unparseable, using midpoint score"
    );
    ParsedEvaluation {
        score: FALLBACK_SCORE,
        overall_feedback: FEEDBACK_UNAVAILABLE.to_string(),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        recovery: Recovery::Fallback,
    }
}

/// Pattern search for a score. `38/50` and `38 out of 50` win over a keyed
/// `"score": 38` / `score = "38"`, which needs an explicit separator.
pub fn recover_score(text: &str) -> Option<u8> {
    static SCORE: OnceLock<Regex> = OnceLock::new();
    static OUT_OF: OnceLock<Regex> = OnceLock::new();
    let keyed = SCORE.get_or_init(|| {
        Regex::new(r#"(?i)"?score"?\s*[:=]\s*"?(\d+(?:\.\d+)?)"#).expect("score regex is valid")
    });
    let out_of = OUT_OF.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*(?:/|out of)\s*50\b").expect("out-of regex is valid")
    });

    out_of
        .captures(text)
        .or_else(|| keyed.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(clamp_score)
}

/// Scores arrive as `42`, `42.5`, or sometimes `"42"`.
fn number_or_numeric_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    match Score::deserialize(deserializer)? {
        Score::Number(n) => Ok(n),
        Score::Text(s) => s
            .trim()
            .trim_end_matches("/50")
            .trim()
            .parse::<f64>()
            .map_err(serde::de::Error::custom),
    }
}

fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return FALLBACK_SCORE;
    }
    score.round().clamp(0.0, MAX_SCORE as f64) as u8
}

fn non_empty(feedback: String) -> String {
    if feedback.trim().is_empty() {
        FEEDBACK_UNAVAILABLE.to_string()
    } else {
        feedback
    }
}

fn prose_feedback(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        FEEDBACK_UNAVAILABLE.to_string()
    } else {
        crate::util::clip(text, 1000).to_string()
    }
}
