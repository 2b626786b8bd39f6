//! Sync command

use std::io::{self, Write};

use clap::Args;
use tracing::info;

use fleet_git::{GitRepo, SyncOptions};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Keep a branch up to date with its upstream.
///
/// TARGET is a tag, a local branch or a remote branch, and defaults to the
/// current branch. A tag is checked out. A local branch is checked out, then
/// fast-forwarded when behind, rebased when diverged, or pushed when ahead and
/// pushes are allowed. A branch that only exists on a remote is checked out
/// as a new tracking branch.
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Only print the commands, don't run them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Allow pushes to the remote repository
    #[arg(long)]
    pub push: bool,

    /// Tag or branch to sync (default: the current branch)
    pub target: Option<String>,
}

impl SyncCommand {
    /// Execute the sync command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(target = ?self.target, dry_run = self.dry_run, "executing sync command");
        let cwd = std::env::current_dir()?;
        let repo = GitRepo::discover(&cwd)?;

        let options = SyncOptions {
            allow_push: self.push,
        };
        let plan = match &self.target {
            Some(name) => repo.plan_sync(name, options)?,
            None => repo.plan_sync_current(options)?,
        };

        if self.dry_run {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match cli.format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut out, &plan.command_lines())?;
                    writeln!(out)?;
                }
                OutputFormat::Text => {
                    for line in plan.command_lines() {
                        writeln!(out, "{}", line)?;
                    }
                }
            }
            return Ok(());
        }

        plan.run(&repo)?;
        if plan.is_empty() && !cli.quiet && cli.format == OutputFormat::Text {
            output::success("already up to date");
        }
        Ok(())
    }
}
