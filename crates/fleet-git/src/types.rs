//! Git types

use serde::Serialize;

/// One line of commit history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Abbreviated commit id
    pub short_id: String,
    /// First line of the message
    pub subject: String,
}

impl std::fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.short_id, self.subject)
    }
}

/// How two references diverge
#[derive(Debug, Clone, Serialize)]
pub struct Divergence {
    /// Full name of the local side
    pub local: String,
    /// Full name of the base side
    pub base: String,
    /// Commits reachable only from `local`
    pub ahead: usize,
    /// Commits reachable only from `base`
    pub behind: usize,
    /// Non-merge commits only on the local side, newest first
    pub ahead_commits: Vec<CommitSummary>,
    /// Non-merge commits only on the base side, newest first
    pub behind_commits: Vec<CommitSummary>,
}
