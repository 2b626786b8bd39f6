//! Error types for fleet

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias using FleetError
pub type Result<T> = std::result::Result<T, FleetError>;

/// Error type for configuration loading and target discovery
#[derive(Debug, Error)]
pub enum FleetError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Target discovery errors
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building the target list
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// None of the candidate build-description files exist
    #[error("no source list found in {dir} (looked for {candidates})")]
    NoSourceFile { dir: PathBuf, candidates: String },

    /// The make program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// make ran but reported an error
    #[error("{program} -Bnf {file} {target} failed ({status}): {stderr}")]
    MakeFailed {
        program: String,
        file: String,
        target: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Repository has no commits
    #[error("empty repository")]
    EmptyRepository,

    /// Reference does not exist
    #[error("{0}: no such reference")]
    NoSuchRef(String),

    /// Branch has no configured upstream
    #[error("{0}: no upstream branch")]
    NoUpstream(String),

    /// Upstream is configured but its ref is gone
    #[error("{branch}: upstream branch '{upstream}' seems to have been deleted")]
    UpstreamDeleted { branch: String, upstream: String },

    /// Upstream does not follow refs/remotes/<remote>/<name>
    #[error(
        "{branch}: upstream branch '{upstream}' is not of the form 'refs/remotes/<remote>/{name}'"
    )]
    UnexpectedUpstream {
        branch: String,
        upstream: String,
        name: String,
    },

    /// Nothing matched the requested sync target
    #[error("{0}: no branch or tag found")]
    NothingToSync(String),

    /// A git CLI invocation failed
    #[error("error running {command}: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Why a single task did not succeed.
///
/// Stored as the task outcome; never aborts the batch.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The process could not be started (missing executable, bad directory, permissions)
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the process output or waiting for it failed
    #[error("capturing output: {0}")]
    Capture(#[source] std::io::Error),

    /// The process ran and exited unsuccessfully
    #[error("{0}")]
    Exit(ExitStatus),

    /// The worker pool stopped before the task reached a worker
    #[error("not run: no worker left to take it")]
    NotRun,
}

impl TaskError {
    /// Whether the process never started
    pub fn is_spawn(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }

    /// Exit code, when the process exited normally with one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit(status) => status.code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_messages() {
        let err = GitError::UpstreamDeleted {
            branch: "refs/heads/main".to_string(),
            upstream: "refs/remotes/origin/main".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "refs/heads/main: upstream branch 'refs/remotes/origin/main' seems to have been deleted"
        );
        assert_eq!(
            GitError::NoSuchRef("topic".to_string()).to_string(),
            "topic: no such reference"
        );
    }

    #[test]
    fn test_task_error_spawn() {
        let err = TaskError::Spawn {
            program: "nope".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_spawn());
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.to_string(), "nope: not found");
    }

    #[test]
    fn test_fleet_error_from_config() {
        let err: FleetError = ConfigError::InvalidValue {
            field: "exec.command".to_string(),
            message: "cannot be empty".to_string(),
        }
        .into();
        assert!(matches!(err, FleetError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: exec.command - cannot be empty"
        );
    }
}
