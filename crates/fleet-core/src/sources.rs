//! Target discovery from a makefile of `git clone` recipes
//!
//! The checkouts composing a project are listed as `git clone <url> -b
//! <branch> <dir>` commands in a makefile. Running make in dry-run mode
//! expands the recipe and every clone line becomes a [`Target`].

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::config::{SourceFile, SourcesConfig};
use crate::error::{DiscoveryError, Result};
use crate::types::{sort_and_dedup, Target};

fn clone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"git\s+clone\s+(?P<url>\S+)\s+-b\s+(?P<branch>\S+)\s+(?P<dir>\S+)")
            .expect("clone pattern is a valid regex")
    })
}

/// Finds the target list of a project directory
#[derive(Debug, Clone)]
pub struct SourceDiscovery {
    root: PathBuf,
    config: SourcesConfig,
}

impl SourceDiscovery {
    /// Create a discovery rooted at `root`
    pub fn new(root: impl Into<PathBuf>, config: SourcesConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// The first candidate source file present in the root directory
    pub fn detect(&self) -> Option<&SourceFile> {
        self.config
            .files
            .iter()
            .find(|candidate| self.root.join(&candidate.file).is_file())
    }

    /// Discover targets, sorted by directory with duplicates removed
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn discover(&self) -> Result<Vec<Target>> {
        let source = self.detect().ok_or_else(|| DiscoveryError::NoSourceFile {
            dir: self.root.clone(),
            candidates: self
                .config
                .files
                .iter()
                .map(|c| c.file.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        info!(file = %source.file, target = %source.target, "expanding source list");

        let output = Command::new(&self.config.make)
            .arg("-Bnf")
            .arg(&source.file)
            .arg(&source.target)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DiscoveryError::Spawn {
                program: self.config.make.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DiscoveryError::MakeFailed {
                program: self.config.make.clone(),
                file: source.file.clone(),
                target: source.target.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let mut targets = parse_clone_lines(&String::from_utf8_lossy(&output.stdout));
        sort_and_dedup(&mut targets);
        debug!(count = targets.len(), "discovered targets");
        Ok(targets)
    }
}

/// Extract targets from the expanded make recipe, in input order
pub fn parse_clone_lines(text: &str) -> Vec<Target> {
    text.lines()
        .filter_map(|line| {
            let caps = clone_pattern().captures(line.trim())?;
            Some(Target::new(&caps["dir"], &caps["branch"], &caps["url"]))
        })
        .collect()
}
