//! Exec command

use std::io;
use std::time::Duration;

use clap::Args;
use tracing::info;

use fleet_core::config::DEFAULT_COMMAND;
use fleet_core::types::with_root;
use fleet_tasks::{CommandTemplate, CompletionSender, Scheduler, SchedulerOptions, Task};

use super::list::{discover, write_targets};
use crate::cli::output::report;
use crate::cli::{Cli, OutputFormat};

/// Run a command in every repository of the project
#[derive(Debug, Args)]
pub struct ExecCommand {
    /// Command to run (defaults to the configured command, usually git)
    #[arg(short, long)]
    pub command: Option<String>,

    /// Number of parallel jobs; zero or less runs every repository at once
    #[arg(short, long, allow_negative_numbers = true)]
    pub jobs: Option<i32>,

    /// Print in short, machine-friendly format
    #[arg(short, long)]
    pub short: bool,

    /// Arguments passed to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl ExecCommand {
    /// Execute the exec command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(command = ?self.command, args = ?self.args, "executing exec command");
        let cwd = std::env::current_dir()?;
        let (config, targets) = discover(&cwd)?;

        let program = self
            .command
            .clone()
            .unwrap_or_else(|| config.exec.command.clone());
        if self.args.is_empty() && program == DEFAULT_COMMAND {
            let stdout = io::stdout();
            return write_targets(&mut stdout.lock(), cli.format, &targets);
        }

        let options = SchedulerOptions {
            concurrency: self.jobs.unwrap_or(config.exec.jobs),
            progress_delay: Duration::from_millis(config.exec.progress_delay_ms),
        };
        let command = CommandTemplate::new(program).with_args(&self.args);
        let scheduler = Scheduler::new(command, options);
        let targets = with_root(targets);

        let runtime = tokio::runtime::Runtime::new()?;
        let tasks = if config.exec.progress && !cli.quiet {
            runtime.block_on(scheduler.run_with_progress(targets, io::stderr()))
        } else {
            runtime.block_on(scheduler.run(targets, CompletionSender::detached()))
        };

        let failed = tasks.iter().filter(|t| !t.is_success()).count();
        info!(tasks = tasks.len(), failed, "exec finished");

        self.print(cli.format, &tasks)
    }

    fn print(&self, format: OutputFormat, tasks: &[Task]) -> anyhow::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match format {
            OutputFormat::Json => report::write_json(&mut out, tasks)?,
            OutputFormat::Text if self.short => report::write_short(&mut out, tasks)?,
            OutputFormat::Text => report::write_long(&mut out, tasks)?,
        }
        Ok(())
    }
}
