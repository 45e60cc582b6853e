// src/cli/problems.rs — `interviewer problems`

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::types::DsaProblem;
use crate::infra::config::Config;
use crate::problems;

pub fn run_problems(config: &Config, count: usize, seed: Option<u64>, json: bool) -> anyhow::Result<()> {
    let catalog = problems::load_configured(&config.interview)?;
    let selection = match seed {
        Some(seed) => catalog.select_balanced_set_with(count, &mut StdRng::seed_from_u64(seed)),
        None => catalog.select_balanced_set(count),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    eprintln!(
        "{} of {} problems across {} topics\n",
        selection.len(),
        catalog.len(),
        catalog.by_topic().len()
    );
    for (i, problem) in selection.iter().enumerate() {
        println!("{}. {}", i + 1, headline(problem));
    }
    Ok(())
}

/// One-line label: title, difficulty, topics.
pub fn headline(problem: &DsaProblem) -> String {
    format!(
        "{} [{}] ({})",
        problem.title,
        problem.difficulty,
        problem.topics.join(", ")
    )
}

/// Full statement for the terminal.
pub fn render(problem: &DsaProblem) -> String {
    let mut out = String::new();
    out.push_str(&headline(problem));
    out.push_str("\n\n");
    out.push_str(&problem.description);
    out.push('\n');
    if !problem.input_format.is_empty() {
        out.push_str(&format!("\nInput:  {}", problem.input_format));
    }
    if !problem.output_format.is_empty() {
        out.push_str(&format!("\nOutput: {}", problem.output_format));
    }
    for (i, sample) in problem.samples.iter().enumerate() {
        out.push_str(&format!("\n\nExample {}:\n  in:  {}\n  out: {}", i + 1, sample.input, sample.output));
        if let Some(explanation) = &sample.explanation {
            out.push_str(&format!("\n  why: {}", explanation));
        }
    }
    out.push('\n');
    out
}
