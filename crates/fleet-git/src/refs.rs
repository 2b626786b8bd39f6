//! Reference lookups: names, upstreams and ahead/behind counts

use git2::{ErrorCode, Oid};
use tracing::debug;

use fleet_core::error::GitError;

use crate::repository::{GitRepo, Result};

/// Prefix of local branch references
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of tag references
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Prefix of remote-tracking references
pub const REMOTES_PREFIX: &str = "refs/remotes/";

impl GitRepo {
    /// Full name of what HEAD points to, or `HEAD` when detached
    pub fn head_ref(&self) -> Result<String> {
        let head = self.repo.find_reference("HEAD")?;
        Ok(head
            .symbolic_target()
            .map(str::to_string)
            .unwrap_or_else(|| "HEAD".to_string()))
    }

    /// Whether the repository has no commit yet
    pub fn is_empty(&self) -> Result<bool> {
        match self.repo.head() {
            Ok(_) => Ok(false),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a short or full reference name to its full name
    pub fn resolve_ref(&self, name: &str) -> Result<Option<String>> {
        if name == "HEAD" {
            return self.head_ref().map(Some);
        }
        match self.repo.resolve_reference_from_short_name(name) {
            Ok(reference) => Ok(reference.name().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound || e.code() == ErrorCode::InvalidSpec => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a reference name, failing when it does not exist
    pub fn require_ref(&self, name: &str) -> Result<String> {
        let full = self
            .resolve_ref(name)?
            .ok_or_else(|| GitError::NoSuchRef(name.to_string()))?;
        if full != "HEAD" && !self.has_ref(&full) {
            return Err(GitError::NoSuchRef(name.to_string()));
        }
        Ok(full)
    }

    /// Whether a full reference name exists
    pub fn has_ref(&self, full_name: &str) -> bool {
        self.repo.find_reference(full_name).is_ok()
    }

    /// Short, unambiguous form of a full reference name
    pub fn abbrev(&self, full_name: &str) -> String {
        self.repo
            .find_reference(full_name)
            .ok()
            .and_then(|r| r.shorthand().map(str::to_string))
            .unwrap_or_else(|| full_name.to_string())
    }

    /// Configured upstream of a local branch, as a full reference name
    pub fn upstream_of(&self, branch: &str) -> Result<Option<String>> {
        match self.repo.branch_upstream_name(branch) {
            Ok(buf) => Ok(buf.as_str().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Upstream of a local branch, checked to still exist
    pub fn require_upstream(&self, branch: &str) -> Result<String> {
        let upstream = self
            .upstream_of(branch)?
            .ok_or_else(|| GitError::NoUpstream(branch.to_string()))?;
        if !self.has_ref(&upstream) {
            return Err(GitError::UpstreamDeleted {
                branch: branch.to_string(),
                upstream,
            });
        }
        Ok(upstream)
    }

    /// Commit id a revision points to
    pub(crate) fn commit_id(&self, spec: &str) -> Result<Oid> {
        Ok(self.repo.revparse_single(spec)?.peel_to_commit()?.id())
    }

    /// Number of commits only reachable from `local` and only from `upstream`
    pub fn ahead_behind(&self, local: &str, upstream: &str) -> Result<(usize, usize)> {
        let local_id = self.commit_id(local)?;
        let upstream_id = self.commit_id(upstream)?;
        let counts = self.repo.graph_ahead_behind(local_id, upstream_id)?;
        debug!(local, upstream, ahead = counts.0, behind = counts.1, "ahead/behind");
        Ok(counts)
    }
}

/// Short branch name of a `refs/heads/` reference
pub fn branch_name(full_name: &str) -> &str {
    full_name.strip_prefix(HEADS_PREFIX).unwrap_or(full_name)
}
