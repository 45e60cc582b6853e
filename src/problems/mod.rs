// src/problems/mod.rs — DSA problem catalog

pub mod catalog;

pub use catalog::ProblemCatalog;

use crate::infra::config::InterviewConfig;
use crate::infra::errors::Result;

/// Load the configured catalog, or the built-in one when no path is set.
pub fn load_configured(config: &InterviewConfig) -> Result<ProblemCatalog> {
    match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading custom problem catalog");
            ProblemCatalog::load(path)
        }
        None => ProblemCatalog::builtin(),
    }
}
