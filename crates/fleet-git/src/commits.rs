//! Commit history between two references

use git2::{Oid, Sort};
use tracing::instrument;

use crate::repository::{GitRepo, Result};
use crate::types::{CommitSummary, Divergence};

impl GitRepo {
    /// Compare `local` with `base`: commit counts on each side plus the
    /// non-merge commits that make up the difference.
    #[instrument(skip(self))]
    pub fn divergence(&self, local: &str, base: &str) -> Result<Divergence> {
        let local_id = self.commit_id(local)?;
        let base_id = self.commit_id(base)?;
        let (ahead, behind) = self.repo.graph_ahead_behind(local_id, base_id)?;

        Ok(Divergence {
            local: local.to_string(),
            base: base.to_string(),
            ahead,
            behind,
            ahead_commits: self.only_in(local_id, base_id)?,
            behind_commits: self.only_in(base_id, local_id)?,
        })
    }

    /// Non-merge commits reachable from `from` but not from `hidden`
    fn only_in(&self, from: Oid, hidden: Oid) -> Result<Vec<CommitSummary>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(from)?;
        revwalk.hide(hidden)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() > 1 {
                continue;
            }
            let short_id = commit.as_object().short_id()?;
            commits.push(CommitSummary {
                short_id: short_id.as_str().unwrap_or_default().to_string(),
                subject: commit.summary().unwrap_or_default().to_string(),
            });
        }

        Ok(commits)
    }
}
