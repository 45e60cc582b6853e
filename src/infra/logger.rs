// src/infra/logger.rs — Structured logging with tracing
//
// Interviewer lines go to stdout, so logs are written to stderr.

use tracing_subscriber::{fmt, EnvFilter};

const FALLBACK_LEVEL: &str = "warn";

/// Install the global subscriber. `RUST_LOG` wins over `level`; an invalid
/// `level` falls back to warn. A second call is a no-op.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging already initialised");
    }
}
