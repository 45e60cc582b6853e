// src/evaluator/judge.rs — Rubric prompt for LLM code review

use crate::core::types::DsaProblem;

/// Rubric dimensions and their weight (percent of the 0–50 scale).
pub const RUBRIC: [(&str, u8); 5] = [
    ("Correctness", 40),
    ("Efficiency (time and space complexity)", 25),
    ("Code quality and readability", 20),
    ("Edge case handling", 10),
    ("Language best practices", 5),
];

/// Build the evaluation request for one submission.
pub fn rubric_prompt(problem: &DsaProblem, code: &str, language: &str) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(
        "You are a senior engineer grading a coding interview submission. \
         Score it on a 0-50 scale using the weighted rubric below.\n\n",
    );

    prompt.push_str("## Rubric\n");
    for (name, weight) in RUBRIC {
        prompt.push_str(&format!("- {} — {}%\n", name, weight));
    }
    prompt.push('\n');

    prompt.push_str(&format!("## Problem: {} ({})\n", problem.title, problem.difficulty));
    prompt.push_str(&problem.description);
    prompt.push('\n');
    if !problem.input_format.is_empty() {
        prompt.push_str(&format!("Input: {}\n", problem.input_format));
    }
    if !problem.output_format.is_empty() {
        prompt.push_str(&format!("Output: {}\n", problem.output_format));
    }
    for (i, sample) in problem.samples.iter().enumerate() {
        prompt.push_str(&format!(
            "Example {}: input `{}` → output `{}`\n",
            i + 1,
            sample.input,
            sample.output
        ));
    }
    prompt.push('\n');

    prompt.push_str(&format!("## Submission ({})\n```{}\n{}\n```\n\n", language, language, code));

    prompt.push_str(
        "Respond with a single JSON object and nothing else:\n\
         {\"score\": <integer 0-50>, \"overallFeedback\": \"<2-3 sentences>\", \
         \"strengths\": [\"...\"], \"weaknesses\": [\"...\"]}\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Difficulty, SampleCase};

    #[test]
    fn test_weights_cover_the_scale() {
        let total: u32 = RUBRIC.iter().map(|(_, w)| *w as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_prompt_contents() {
        let problem = DsaProblem {
            id: "two-sum".into(),
            title: "Two Sum".into(),
            description: "Find two indices adding to target.".into(),
            difficulty: Difficulty::Easy,
            topics: vec!["arrays".into()],
            input_format: "nums, target".into(),
            output_format: "pair of indices".into(),
            samples: vec![SampleCase {
                input: "[2,7,11,15], 9".into(),
                output: "[0,1]".into(),
                explanation: None,
            }],
        };
        let p = rubric_prompt(&problem, "fn main() {}", "rust");
        assert!(p.contains("Correctness — 40%"));
        assert!(p.contains("Language best practices — 5%"));
        assert!(p.contains("Two Sum (Easy)"));
        assert!(p.contains("```rust\nfn main() {}\n```"));
        assert!(p.contains("0-50"));
    }
}
