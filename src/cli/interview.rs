// src/cli/interview.rs — Terminal-driven interview REPL

use std::path::{Path, PathBuf};

use crate::core::orchestrator::{AnswerResult, InterviewOrchestrator};
use crate::core::types::{CandidateProfile, CompanyProfile, InterviewKind};
use crate::gateway::resume;
use crate::infra::config::Config;
use crate::infra::errors::InterviewError;

/// Everything the user may pass on the command line; missing parts are prompted.
pub struct InterviewArgs {
    pub kind: Option<InterviewKind>,
    pub resume: Option<PathBuf>,
    pub company: Option<String>,
    pub org_type: Option<String>,
    pub role: Option<String>,
    pub seniority: Option<String>,
}

enum Command {
    Quit,
    End,
    Problem,
    Help,
    Code { path: PathBuf, language: String },
    Audio(PathBuf),
    Say(String),
    Empty,
}

fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    match trimmed {
        "" => Command::Empty,
        ":quit" | ":q" | "quit" | "exit" => Command::Quit,
        ":end" | ":finish" => Command::End,
        ":problem" | ":p" => Command::Problem,
        ":help" | ":h" => Command::Help,
        _ => {
            if let Some(rest) = trimmed.strip_prefix(":code") {
                let mut parts = rest.split_whitespace();
                if let Some(path) = parts.next() {
                    let language = parts.next().map(str::to_string).unwrap_or_else(|| {
                        language_from_extension(Path::new(path)).to_string()
                    });
                    return Command::Code {
                        path: PathBuf::from(path),
                        language,
                    };
                }
                return Command::Help;
            }
            if let Some(path) = trimmed.strip_prefix('@') {
                return Command::Audio(PathBuf::from(path.trim()));
            }
            Command::Say(trimmed.to_string())
        }
    }
}

fn language_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "rs" => "rust",
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "java" => "java",
        "cpp" | "cc" | "cxx" => "cpp",
        "c" => "c",
        "kt" => "kotlin",
        "rb" => "ruby",
        _ => "text",
    }
}

pub async fn run_interview(config: &Config, args: InterviewArgs) -> anyhow::Result<()> {
    let orchestrator = InterviewOrchestrator::from_config(config)?;

    let kind = match args.kind {
        Some(k) => k,
        None => inquire::Select::new("Interview type:", InterviewKind::ALL.to_vec()).prompt()?,
    };
    let candidate = load_candidate(args.resume.as_deref(), kind)?;
    let company = CompanyProfile {
        name: ask_or("Company:", args.company, "Acme Corp")?,
        organization_type: ask_or("Organization type:", args.org_type, "startup")?,
        role: ask_or("Role:", args.role, "Software Engineer")?,
        seniority: ask_or("Seniority:", args.seniority, "mid-level")?,
    };

    let session_id = orchestrator.create_session(company, candidate, kind)?;
    let start = orchestrator.start_interview(&session_id).await?;

    eprintln!(
        "\n{} interview, {} minutes (wrap-up at {}). Type :help for commands.\n",
        kind.label(),
        start.max_duration_minutes,
        start.wrap_up_threshold_minutes
    );
    if let Some(problems) = &start.dsa_problems {
        eprintln!("Problems for this session:");
        for (i, p) in problems.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, super::problems::headline(p));
        }
        eprintln!();
    }
    println!("Interviewer: {}\n", start.question);

    while let Some(input) = read_input() {
        match parse_command(&input) {
            Command::Empty => continue,
            Command::Help => print_help(),
            Command::Quit => {
                orchestrator.terminate(&session_id);
                eprintln!("Interview abandoned.");
                return Ok(());
            }
            Command::End => match orchestrator.finalize(&session_id).await {
                Ok(result) => {
                    println!("\n{}\n", result.summary_text);
                    eprintln!(
                        "{} rounds, {} answers, {} tone samples",
                        result.total_rounds, result.response_count, result.tone_sample_count
                    );
                    return Ok(());
                }
                Err(e) => eprintln!("[error] {e}"),
            },
            Command::Problem => match orchestrator.snapshot(&session_id).await {
                Ok(session) => match session.current_problem() {
                    Some(p) if kind == InterviewKind::Dsa || session.coding_problem_revealed() => {
                        println!("\n{}", super::problems::render(p))
                    }
                    _ => eprintln!("No coding problem is active."),
                },
                Err(e) => eprintln!("[error] {e}"),
            },
            Command::Code { path, language } => {
                let code = match std::fs::read_to_string(&path) {
                    Ok(code) => code,
                    Err(e) => {
                        eprintln!("[error] {}: {e}", path.display());
                        continue;
                    }
                };
                eprintln!("Evaluating {} solution...", language);
                match orchestrator.submit_code(&session_id, &code, &language).await {
                    Ok(result) => {
                        println!(
                            "\nScore: {}/50. {}",
                            result.evaluation.score, result.evaluation.overall_feedback
                        );
                        if result.should_move_to_next_problem {
                            if let Some(p) = &result.current_problem {
                                eprintln!(
                                    "Next problem ({}/{}): {}",
                                    result.current_index + 1,
                                    result.total_problems,
                                    super::problems::headline(p)
                                );
                            }
                        }
                        println!("\nInterviewer: {}\n", result.next_question);
                        if result.is_wrap_up {
                            eprintln!("(wrapping up; type :end for your report)");
                        }
                    }
                    Err(e) => report(&e),
                }
            }
            Command::Audio(path) => {
                let audio = match std::fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        eprintln!("[error] {}: {e}", path.display());
                        continue;
                    }
                };
                match orchestrator.submit_answer(&session_id, &audio).await {
                    Ok(result) => {
                        eprintln!("(heard: {})", result.transcript);
                        show_answer(&result);
                    }
                    Err(e) => report(&e),
                }
            }
            Command::Say(text) => match orchestrator.submit_transcript(&session_id, &text).await {
                Ok(result) => show_answer(&result),
                Err(e) => report(&e),
            },
        }
    }

    // EOF: nothing to summarize from a closed terminal.
    orchestrator.terminate(&session_id);
    Ok(())
}

fn show_answer(result: &AnswerResult) {
    if result.show_coding_problem || (result.should_move_to_next_problem && result.current_problem.is_some()) {
        if let Some(p) = &result.current_problem {
            println!("\n{}", super::problems::render(p));
        }
    }
    println!("\nInterviewer: {}\n", result.question);
    if result.is_wrap_up {
        eprintln!(
            "(wrapping up, {} min left; type :end for your report)",
            result.remaining_minutes
        );
    }
}

fn report(e: &InterviewError) {
    if e.is_transport() {
        eprintln!("[error] {e} (nothing was recorded; try again)");
    } else {
        eprintln!("[error] {e}");
    }
}

fn print_help() {
    eprintln!(
        "  <text>               answer the question\n  \
         @<file>              answer with a recorded audio file\n  \
         :code <file> [lang]  submit a solution for the current problem\n  \
         :problem             show the current problem\n  \
         :end                 finish and print the report\n  \
         :quit                abandon the interview"
    );
}

fn load_candidate(path: Option<&Path>, kind: InterviewKind) -> anyhow::Result<CandidateProfile> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None if kind != InterviewKind::Dsa => {
            let answer = inquire::Text::new("Resume file (blank to skip):").prompt()?;
            let answer = answer.trim();
            (!answer.is_empty()).then(|| PathBuf::from(answer))
        }
        None => None,
    };

    match path {
        Some(path) => {
            let bytes = std::fs::read(&path)?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let extracted = resume::extract(&bytes, file_name)?;
            eprintln!("Loaded resume for {}", extracted.best_effort_name);
            Ok(extracted.into())
        }
        None => Ok(CandidateProfile {
            name: inquire::Text::new("Your name:")
                .with_default("Candidate")
                .prompt()?,
            resume_text: String::new(),
        }),
    }
}

fn ask_or(label: &str, given: Option<String>, default: &str) -> anyhow::Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(inquire::Text::new(label).with_default(default).prompt()?),
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
