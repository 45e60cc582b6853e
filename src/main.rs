// src/main.rs — interviewer entry point

use clap::Parser;

use interview_orchestrator::cli::interview::InterviewArgs;
use interview_orchestrator::cli::{Cli, Commands};
use interview_orchestrator::infra::config::Config;
use interview_orchestrator::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG when set
    logger::init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Falls back to defaults if no config.toml
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Interview {
            kind,
            resume,
            company,
            org_type,
            role,
            seniority,
        } => {
            let args = InterviewArgs {
                kind,
                resume,
                company,
                org_type,
                role,
                seniority,
            };
            interview_orchestrator::cli::interview::run_interview(&config, args).await
        }
        Commands::Problems { count, seed, json } => {
            interview_orchestrator::cli::problems::run_problems(&config, count, seed, json)
        }
        Commands::Evaluate {
            problem,
            language,
            file,
        } => {
            interview_orchestrator::cli::evaluate::run_evaluate(&config, &problem, &language, &file)
                .await
        }
    }
}
