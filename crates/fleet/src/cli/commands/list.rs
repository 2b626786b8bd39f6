//! List command

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use tracing::info;

use fleet_core::config::{load_config_or_default, Config};
use fleet_core::{SourceDiscovery, Target};

use crate::cli::output::table::Table;
use crate::cli::{Cli, OutputFormat};

/// List the repositories of the project
#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    /// Execute the list command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing list command");
        let cwd = std::env::current_dir()?;
        let (_, targets) = discover(&cwd)?;

        let stdout = io::stdout();
        write_targets(&mut stdout.lock(), cli.format, &targets)
    }
}

/// Load the configuration for `dir` and discover its targets
pub(super) fn discover(dir: &Path) -> anyhow::Result<(Config, Vec<Target>)> {
    let (config, config_path) = load_config_or_default(dir)?;
    if let Some(path) = &config_path {
        info!(path = %path.display(), "using config");
    }

    let targets = SourceDiscovery::new(dir, config.sources.clone()).discover()?;
    info!(targets = targets.len(), "discovered targets");
    Ok((config, targets))
}

/// Render targets as aligned `<dir> <branch> <url>` rows or a JSON array
pub(super) fn write_targets<W: Write>(
    out: &mut W,
    format: OutputFormat,
    targets: &[Target],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, targets)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let mut table = Table::new();
            for target in targets {
                table.row([target.to_string(), target.branch.clone(), target.url.clone()]);
            }
            table.write_to(out)?;
        }
    }
    Ok(())
}
