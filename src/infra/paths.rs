// src/infra/paths.rs — Config and data locations
//
// All paths respect the INTERVIEWER_HOME environment variable for isolation.
// When INTERVIEWER_HOME is set, config and data live under that directory.
// When unset, config uses ~/.interviewer/ and data uses XDG_DATA_HOME/interviewer.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

fn interviewer_home() -> Option<PathBuf> {
    std::env::var_os("INTERVIEWER_HOME").map(PathBuf::from)
}

/// Home directory, or the working directory when no home can be determined.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $INTERVIEWER_HOME/ or ~/.interviewer/
pub fn config_dir() -> PathBuf {
    if let Some(home) = interviewer_home() {
        return home;
    }
    dirs_home().join(".interviewer")
}

/// Data directory: $INTERVIEWER_HOME/data/ or ~/.local/share/interviewer/
pub fn data_dir() -> PathBuf {
    if let Some(home) = interviewer_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "interviewer")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Archived interview transcripts
pub fn sessions_dir() -> PathBuf {
    data_dir().join("sessions")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
