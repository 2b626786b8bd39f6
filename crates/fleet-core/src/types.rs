//! Core types for fleet

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A directory-scoped unit of work: one checkout the batch command runs in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Working directory of the checkout
    pub dir: PathBuf,
    /// Branch or reference the checkout tracks
    pub branch: String,
    /// Origin the checkout was cloned from
    pub url: String,
}

impl Target {
    /// Create a new target
    pub fn new(dir: impl Into<PathBuf>, branch: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            branch: branch.into(),
            url: url.into(),
        }
    }

    /// The caller's own working directory
    pub fn root() -> Self {
        Self::new(".", "HEAD", "")
    }

    /// Whether this is the synthetic root target
    pub fn is_root(&self) -> bool {
        self.dir == Path::new(".")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir.display())
    }
}

/// Sort targets by directory and drop repeated directories, keeping the first.
pub fn sort_and_dedup(targets: &mut Vec<Target>) {
    targets.sort_by(|a, b| a.dir.cmp(&b.dir));
    targets.dedup_by(|a, b| a.dir == b.dir);
}

/// Put the root target in front of the discovered ones.
pub fn with_root(targets: Vec<Target>) -> Vec<Target> {
    let mut all = Vec::with_capacity(targets.len() + 1);
    all.push(Target::root());
    all.extend(targets.into_iter().filter(|t| !t.is_root()));
    all
}
