//! Divg command

use std::io::{self, Write};

use clap::Args;
use tracing::info;

use fleet_git::{git_output, run_git, Divergence, GitRepo};

use crate::cli::output::plural;
use crate::cli::{Cli, OutputFormat};

/// Show the commits in LOCAL that are ahead of or behind BASE.
///
/// By default BASE is the upstream of LOCAL, and LOCAL is the current branch.
/// When LOCAL is the current branch and there are uncommitted changes, a
/// short status follows.
#[derive(Debug, Args)]
pub struct DivgCommand {
    /// Fetch first
    #[arg(short = 'u', long = "update")]
    pub update: bool,

    /// Also show the status when there are untracked files
    #[arg(short = 'a', long = "untracked")]
    pub untracked: bool,

    /// Local reference (default: HEAD)
    pub local: Option<String>,

    /// Base reference (default: the upstream of LOCAL)
    pub base: Option<String>,
}

impl DivgCommand {
    /// Execute the divg command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(local = ?self.local, base = ?self.base, "executing divg command");
        let cwd = std::env::current_dir()?;
        let repo = GitRepo::discover(&cwd)?;

        if self.update {
            run_git(repo.path(), &["fetch"])?;
        }

        let local = match &self.local {
            Some(name) => repo.require_ref(name)?,
            None => repo.head_ref()?,
        };
        let base = match &self.base {
            Some(name) => repo.require_ref(name)?,
            None => repo.require_upstream(&local)?,
        };

        let divergence = repo.divergence(&local, &base)?;
        let abbrev = repo.abbrev(&base);

        let dirty = !repo.is_clean()? || (self.untracked && repo.has_untracked()?);
        let status = if local == repo.head_ref()? && dirty {
            let output = git_output(repo.path(), &["status", "--short"])?;
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            None
        };

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match cli.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "local": divergence.local,
                    "base": divergence.base,
                    "base_abbrev": abbrev,
                    "ahead": divergence.ahead,
                    "behind": divergence.behind,
                    "ahead_commits": divergence.ahead_commits,
                    "behind_commits": divergence.behind_commits,
                    "status": status,
                });
                serde_json::to_writer_pretty(&mut out, &value)?;
                writeln!(out)?;
            }
            OutputFormat::Text => {
                write_divergence(&mut out, &divergence, &abbrev, status.as_deref())?
            }
        }

        Ok(())
    }
}

/// Write the commits on each side, marked `<` (ahead) and `>` (behind),
/// followed by the short status when there is one.
fn write_divergence<W: Write>(
    out: &mut W,
    divergence: &Divergence,
    base: &str,
    status: Option<&str>,
) -> io::Result<()> {
    if divergence.ahead > 0 {
        writeln!(
            out,
            "{} commit{} ahead of {}:",
            divergence.ahead,
            plural(divergence.ahead),
            base
        )?;
        for commit in &divergence.ahead_commits {
            writeln!(out, "<  {}", commit)?;
        }
    }
    if divergence.behind > 0 {
        writeln!(
            out,
            "{} commit{} behind {}:",
            divergence.behind,
            plural(divergence.behind),
            base
        )?;
        for commit in &divergence.behind_commits {
            writeln!(out, ">  {}", commit)?;
        }
    }
    if let Some(status) = status {
        writeln!(out, "status:")?;
        write!(out, "{}", status)?;
    }
    Ok(())
}
