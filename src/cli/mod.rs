// src/cli/mod.rs — CLI definition (clap derive)

pub mod evaluate;
pub mod interview;
pub mod problems;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::InterviewKind;

#[derive(Parser)]
#[command(name = "interviewer", about = "Mock interview orchestrator", version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interview in the terminal
    Interview {
        /// Interview kind: dsa, resume_cs, technical_hr, hr (prompted if omitted)
        #[arg(short, long)]
        kind: Option<InterviewKind>,
        /// Resume file (.txt, .md, .docx)
        #[arg(short, long)]
        resume: Option<PathBuf>,
        /// Company name
        #[arg(long)]
        company: Option<String>,
        /// Organization type, e.g. startup, enterprise
        #[arg(long)]
        org_type: Option<String>,
        /// Target role
        #[arg(long)]
        role: Option<String>,
        /// Seniority level
        #[arg(long)]
        seniority: Option<String>,
    },
    /// Print a balanced selection of DSA problems
    Problems {
        /// Number of problems to draw
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score one solution file against a catalog problem
    Evaluate {
        /// Catalog problem id, e.g. two-sum
        #[arg(short, long)]
        problem: String,
        /// Solution language
        #[arg(short, long, default_value = "python")]
        language: String,
        /// Solution source file
        file: PathBuf,
    },
}
