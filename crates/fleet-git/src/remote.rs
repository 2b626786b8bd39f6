//! Remotes and the git command line

use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::{info, instrument};

use fleet_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Get list of remote names
    pub fn remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes
            .iter()
            .filter_map(|r| r.map(|s| s.to_string()))
            .collect())
    }
}

/// Build a git CLI invocation scoped to `dir`
pub fn git_command<I, S>(dir: &Path, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir).stdin(Stdio::null());
    cmd
}

/// Render a command line for display
pub fn display_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run git with inherited stdout and stderr, failing on a non-zero exit
#[instrument(fields(dir = %dir.display()))]
pub fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
    let start = std::time::Instant::now();
    let mut cmd = git_command(dir, args);
    let status = cmd.status().map_err(|e| GitError::CommandFailed {
        command: display_command(&cmd),
        reason: e.to_string(),
    })?;
    info!(
        duration_ms = start.elapsed().as_millis(),
        success = status.success(),
        "git (CLI)"
    );
    if !status.success() {
        return Err(GitError::CommandFailed {
            command: display_command(&cmd),
            reason: status.to_string(),
        });
    }
    Ok(())
}

/// Run git and capture its output, failing on a non-zero exit
#[instrument(fields(dir = %dir.display()))]
pub fn git_output(dir: &Path, args: &[&str]) -> Result<Output> {
    let mut cmd = git_command(dir, args);
    let output = cmd.output().map_err(|e| GitError::CommandFailed {
        command: display_command(&cmd),
        reason: e.to_string(),
    })?;
    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: display_command(&cmd),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
