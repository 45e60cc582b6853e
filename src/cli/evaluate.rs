// src/cli/evaluate.rs — `interviewer evaluate`

use std::path::Path;

use crate::evaluator::{self, CodeEvaluator};
use crate::gateway::LanguageModelGateway;
use crate::infra::config::Config;
use crate::problems;
use crate::provider::{self, ModelRef};

pub async fn run_evaluate(
    config: &Config,
    problem_id: &str,
    language: &str,
    file: &Path,
) -> anyhow::Result<()> {
    let catalog = problems::load_configured(&config.interview)?;
    let problem = catalog
        .get(problem_id)
        .ok_or_else(|| anyhow::anyhow!("No problem with id '{problem_id}' in the catalog"))?;
    let code = std::fs::read_to_string(file)?;

    let model_ref = ModelRef::parse(&config.models.evaluator).ok_or_else(|| {
        anyhow::anyhow!("Invalid evaluator model '{}'", config.models.evaluator)
    })?;
    let provider = provider::resolve(&model_ref, &config.models)?;
    let gateway = LanguageModelGateway::new(provider, model_ref.model, config.gateways.llm_timeout())
        .with_temperature(0.1)
        .with_max_tokens(2000);

    eprintln!("Evaluating {} against \"{}\"...", file.display(), problem.title);
    let evaluation = CodeEvaluator::new(gateway)
        .evaluate(&code, problem, language)
        .await?;
    let next = evaluator::next_action(evaluation.score);

    println!("Score: {}/50", evaluation.score);
    println!("{}", evaluation.overall_feedback);
    for s in &evaluation.strengths {
        println!("  + {s}");
    }
    for w in &evaluation.weaknesses {
        println!("  - {w}");
    }
    println!("Next: {} ({})", next.action.as_str(), next.rationale);
    Ok(())
}
