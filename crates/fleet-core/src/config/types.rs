//! Configuration types

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_COMMAND, DEFAULT_JOBS, DEFAULT_MAKE, DEFAULT_PROGRESS_DELAY_MS};

/// Main configuration for fleet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch execution settings
    pub exec: ExecConfig,

    /// Where the target list comes from
    pub sources: SourcesConfig,
}

/// Batch execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Program run in every target
    pub command: String,

    /// Number of parallel jobs; zero or negative means one per target
    pub jobs: i32,

    /// Whether to draw the progress indicator on stderr
    pub progress: bool,

    /// How long a batch must run before progress is shown
    pub progress_delay_ms: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            jobs: DEFAULT_JOBS,
            progress: true,
            progress_delay_ms: DEFAULT_PROGRESS_DELAY_MS,
        }
    }
}

/// Target discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// make program used to expand the source file
    pub make: String,

    /// Candidate source files, first existing one wins
    pub files: Vec<SourceFile>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            make: DEFAULT_MAKE.to_string(),
            files: vec![
                SourceFile::new("Dependencyfile", "all"),
                SourceFile::new("Depfile.mk", "clone"),
                SourceFile::new("Makefile", "sources"),
            ],
        }
    }
}

/// A makefile and the target whose recipe clones the checkouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name, relative to the working directory
    pub file: String,
    /// make target to dry-run
    pub target: String,
}

impl SourceFile {
    pub fn new(file: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            target: target.into(),
        }
    }
}
