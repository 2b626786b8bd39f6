//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{CompletionsCommand, DivgCommand, ExecCommand, ListCommand, SyncCommand};

/// fleet - run one command across every repository of a project
#[derive(Debug, Parser)]
#[command(name = "fleet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a command in every repository of the project
    Exec(ExecCommand),

    /// List the repositories of the project
    List(ListCommand),

    /// Show how two references diverge
    Divg(DivgCommand),

    /// Keep a branch up to date with its upstream
    Sync(SyncCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Exec(ref cmd) => cmd.execute(&self),
            Commands::List(ref cmd) => cmd.execute(&self),
            Commands::Divg(ref cmd) => cmd.execute(&self),
            Commands::Sync(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exec_passes_hyphen_args_through() {
        let cli = Cli::parse_from(["fleet", "exec", "-j", "-1", "status", "--short"]);
        match cli.command {
            Commands::Exec(cmd) => {
                assert_eq!(cmd.jobs, Some(-1));
                assert_eq!(cmd.args, vec!["status", "--short"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["fleet", "-q", "--format", "json", "list"]);
        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::List(_)));
    }
}
