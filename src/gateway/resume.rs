// src/gateway/resume.rs — Resume text extraction

use std::io::{Cursor, Read};

use crate::core::types::CandidateProfile;
use crate::infra::errors::InterviewError;

const FALLBACK_NAME: &str = "Candidate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeText {
    pub text: String,
    pub best_effort_name: String,
}

impl From<ResumeText> for CandidateProfile {
    fn from(r: ResumeText) -> Self {
        CandidateProfile {
            name: r.best_effort_name,
            resume_text: r.text,
        }
    }
}

/// Extract plain text and a best-effort candidate name from a resume file.
///
/// Supports plain text (`.txt`, `.md`, or no extension) and `.docx`.
pub fn extract(bytes: &[u8], file_name: &str) -> Result<ResumeText, InterviewError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "" | "txt" | "md" | "text" => String::from_utf8_lossy(bytes).trim().to_string(),
        "docx" => read_docx(bytes)?,
        other => {
            return Err(InterviewError::Resume(format!(
                "unsupported resume format '.{other}'"
            )))
        }
    };

    if text.is_empty() {
        return Err(InterviewError::Resume("resume contains no text".into()));
    }

    let best_effort_name = guess_name(&text).unwrap_or_else(|| FALLBACK_NAME.to_string());
    Ok(ResumeText {
        text,
        best_effort_name,
    })
}

fn read_docx(bytes: &[u8]) -> Result<String, InterviewError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| InterviewError::Resume(format!("not a valid .docx: {e}")))?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| InterviewError::Resume(format!("missing document body: {e}")))?
        .read_to_string(&mut doc_xml)?;

    Ok(docx_text(&doc_xml))
}

/// Text of the `<w:t>` runs, one line per paragraph.
fn docx_text(xml: &str) -> String {
    let mut text = String::new();
    let mut in_text_tag = false;
    let mut chars = xml.chars();

    while let Some(ch) = chars.next() {
        if ch == '<' {
            let mut tag = String::new();
            for c in chars.by_ref() {
                if c == '>' {
                    break;
                }
                tag.push(c);
            }

            let tag = tag.trim();
            if tag == "w:t" || tag.starts_with("w:t ") {
                in_text_tag = true;
            } else if tag == "/w:t" {
                in_text_tag = false;
            } else if tag == "/w:p" || tag.starts_with("w:br") {
                text.push('\n');
            }
        } else if in_text_tag {
            text.push(ch);
        }
    }

    decode_entities(text.trim())
}

/// Single left-to-right pass over the five XML entities, so `&amp;lt;`
/// yields `&lt;` rather than `<`. Unknown entities are kept as written.
fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&apos;", '\''),
        ("&quot;", '"'),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// First non-empty line that looks like a person's name: 2–4 words,
/// letters plus `.`, `'`, `-` only, under 50 characters.
fn guess_name(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.len() >= 50 {
        return None;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return None;
    }
    let looks_like_name = words.iter().all(|w| {
        w.chars().next().is_some_and(char::is_alphabetic)
            && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
    });
    looks_like_name.then(|| words.join(" "))
}
