// src/lib.rs — Library root for the interview orchestrator

pub mod cli;
pub mod core;
pub mod evaluator;
pub mod gateway;
pub mod infra;
pub mod problems;
pub mod provider;
pub mod util;

pub use crate::core::orchestrator::InterviewOrchestrator;
pub use crate::infra::errors::{InterviewError, Result};
