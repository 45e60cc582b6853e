// src/core/reply.rs — Parse language-model replies into structured directives
//
// Recovery ladder, first hit wins:
//   1. the whole reply is a JSON object
//   2. a fenced ```json block
//   3. the outermost {...} span inside prose
//   4. field-by-field regex recovery
//   5. the raw text is the question
// Missing fields default to false/empty. Nothing here returns an error to the caller.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::types::ModelReply;
use crate::infra::errors::InterviewError;

const QUESTION_KEYS: &[&str] = &["question", "nextQuestion", "next_question"];
const MOVE_KEYS: &[&str] = &["shouldMoveToNextProblem", "should_move_to_next_problem"];
const WRAP_UP_KEYS: &[&str] = &["isWrapUp", "is_wrap_up"];
const SHOW_DSA_KEYS: &[&str] = &["showDSAProblem", "showDsaProblem", "show_dsa_problem"];
const SHOW_CODING_KEYS: &[&str] = &["showCodingProblem", "show_coding_problem"];

/// Parse a reply, never failing. See the module docs for the recovery order.
pub fn parse_model_reply(raw: &str) -> ModelReply {
    let text = raw.trim();

    if let Ok(reply) = decode_strict(text) {
        return with_question_fallback(reply, text, text);
    }

    if let Some(block) = extract_fenced_json(text) {
        if let Ok(reply) = decode_strict(block) {
            return with_question_fallback(reply, text, block);
        }
    }

    if let Some(span) = extract_braced_span(text) {
        if let Ok(reply) = decode_strict(span) {
            return with_question_fallback(reply, text, span);
        }
    }

    // A missing question stays empty here; the flow substitutes a phase question.
    if let Some(reply) = recover_fields(text) {
        tracing::debug!("Model reply recovered by field patterns");
        return reply;
    }

    tracing::debug!("Model reply has no structure, using raw text as question");
    ModelReply {
        question: strip_fences(text).to_string(),
        ..Default::default()
    }
}

/// Decode `text` as a JSON object carrying reply fields.
pub fn decode_strict(text: &str) -> Result<ModelReply, InterviewError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        InterviewError::MalformedGatewayReply {
            reason: e.to_string(),
        }
    })?;
    let obj = value
        .as_object()
        .ok_or_else(|| InterviewError::MalformedGatewayReply {
            reason: "reply is not a JSON object".into(),
        })?;

    let question = QUESTION_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .unwrap_or("")
        .trim()
        .to_string();

    Ok(ModelReply {
        question,
        feedback: obj.get("feedback").filter(|v| !v.is_null()).cloned(),
        should_move_to_next_problem: flag(obj, MOVE_KEYS),
        is_wrap_up: flag(obj, WRAP_UP_KEYS),
        show_dsa_problem: flag(obj, SHOW_DSA_KEYS),
        show_coding_problem: flag(obj, SHOW_CODING_KEYS),
    })
}

/// Accepts JSON booleans and the strings "true"/"yes".
fn flag(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| match obj.get(*k) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        _ => false,
    })
}

/// Contents of the first fenced code block, if any.
pub fn extract_fenced_json(text: &str) -> Option<&str> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("fence regex is valid")
    });
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// The span from the first `{` to the last `}`.
pub fn extract_braced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Field-specific regex recovery for replies that are almost JSON.
/// Returns `None` when no field could be recovered.
pub fn recover_fields(text: &str) -> Option<ModelReply> {
    let question = recover_question(text);
    let should_move = recover_flag(text, MOVE_KEYS);
    let is_wrap_up = recover_flag(text, WRAP_UP_KEYS);
    let show_dsa = recover_flag(text, SHOW_DSA_KEYS);
    let show_coding = recover_flag(text, SHOW_CODING_KEYS);

    if question.is_none()
        && should_move.is_none()
        && is_wrap_up.is_none()
        && show_dsa.is_none()
        && show_coding.is_none()
    {
        return None;
    }

    Some(ModelReply {
        question: question.unwrap_or_default(),
        feedback: None,
        should_move_to_next_problem: should_move.unwrap_or(false),
        is_wrap_up: is_wrap_up.unwrap_or(false),
        show_dsa_problem: show_dsa.unwrap_or(false),
        show_coding_problem: show_coding.unwrap_or(false),
    })
}

/// `"question": "..."` with JSON escapes decoded.
pub fn recover_question(text: &str) -> Option<String> {
    static QUESTION: OnceLock<Regex> = OnceLock::new();
    let re = QUESTION.get_or_init(|| {
        Regex::new(r#""(?:question|nextQuestion|next_question)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("question regex is valid")
    });
    let raw = re.captures(text)?.get(1)?.as_str();
    let decoded = serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string());
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `"key": true|false` (quoted or bare value) for any of `keys`.
pub fn recover_flag(text: &str, keys: &[&str]) -> Option<bool> {
    flag_pattern().captures_iter(text).find_map(|c| {
        let key = c.get(1)?.as_str();
        let value = c.get(2)?.as_str();
        keys.iter()
            .any(|k| k.eq_ignore_ascii_case(key))
            .then(|| value.eq_ignore_ascii_case("true"))
    })
}

/// One pattern over every directive key; callers filter by key set.
fn flag_pattern() -> &'static Regex {
    static FLAGS: OnceLock<Regex> = OnceLock::new();
    FLAGS.get_or_init(|| {
        let keys: Vec<String> = [MOVE_KEYS, WRAP_UP_KEYS, SHOW_DSA_KEYS, SHOW_CODING_KEYS]
            .concat()
            .into_iter()
            .map(regex::escape)
            .collect();
        Regex::new(&format!(
            r#"(?i)"?({})"?\s*[:=]\s*"?(true|false)"#,
            keys.join("|")
        ))
        .expect("flag regex is valid")
    })
}

fn strip_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// When the structured reply has no question, use the prose outside the
/// JSON object. With no prose the question stays empty; JSON text is never
/// handed on as a question.
fn with_question_fallback(mut reply: ModelReply, raw: &str, structured: &str) -> ModelReply {
    if reply.question.is_empty() {
        reply.question = prose_outside(raw, structured);
    }
    reply
}

/// `raw` without the `structured` span and any code-fence markers, whitespace collapsed.
fn prose_outside(raw: &str, structured: &str) -> String {
    raw.replacen(structured, " ", 1)
        .replace("```json", " ")
        .replace("```JSON", " ")
        .replace("```", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
