//! Plans that bring a branch up to date with its upstream
//!
//! A plan is computed from repository state first and only then executed, so
//! every precondition failure happens before any git command runs.

use tracing::{debug, instrument};

use fleet_core::error::GitError;

use crate::refs::{branch_name, HEADS_PREFIX, REMOTES_PREFIX, TAGS_PREFIX};
use crate::remote::run_git;
use crate::repository::{GitRepo, Result};

/// Options controlling what a sync may do
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Push local commits when the branch is strictly ahead of upstream
    pub allow_push: bool,
}

/// The git commands a sync will run, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    steps: Vec<Vec<String>>,
}

impl SyncPlan {
    fn add(&mut self, args: &[&str]) {
        self.steps
            .push(args.iter().map(|arg| arg.to_string()).collect());
    }

    /// Whether there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Command lines, as they would be typed
    pub fn command_lines(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|args| format!("git {}", args.join(" ")))
            .collect()
    }

    /// Run every step in the repository, stopping at the first failure
    pub fn run(&self, repo: &GitRepo) -> Result<()> {
        for step in &self.steps {
            let args: Vec<&str> = step.iter().map(String::as_str).collect();
            run_git(repo.path(), &args)?;
        }
        Ok(())
    }
}

impl GitRepo {
    /// Plan a sync with `name`, a tag, a local branch or a remote branch
    #[instrument(skip(self))]
    pub fn plan_sync(&self, name: &str, options: SyncOptions) -> Result<SyncPlan> {
        if self.is_empty()? {
            return Err(GitError::EmptyRepository);
        }

        let mut plan = SyncPlan::default();

        let tag = format!("{}{}", TAGS_PREFIX, name);
        if self.has_ref(&tag) {
            plan.add(&["checkout", &tag]);
            return Ok(plan);
        }

        let branch = format!("{}{}", HEADS_PREFIX, name);
        if self.has_ref(&branch) {
            if self.head_ref()? != branch {
                plan.add(&["checkout", name]);
            }
            let upstream = self.require_upstream(&branch)?;
            let remote = remote_of(&upstream, name).ok_or_else(|| GitError::UnexpectedUpstream {
                branch: branch.clone(),
                upstream: upstream.clone(),
                name: name.to_string(),
            })?;

            let (ahead, behind) = self.ahead_behind(&branch, &upstream)?;
            debug!(ahead, behind, upstream = %upstream, "branch position");
            match (ahead, behind) {
                (0, b) if b > 0 => plan.add(&["merge", "--quiet", "--ff-only", &upstream]),
                (a, b) if a > 0 && b > 0 => {
                    plan.add(&["rebase", "--quiet", "--rebase-merges", &upstream])
                }
                (a, 0) if a > 0 && options.allow_push => {
                    let refspec = format!("HEAD:{}", branch);
                    plan.add(&["push", "--quiet", remote, &refspec]);
                }
                _ => {}
            }
            return Ok(plan);
        }

        for remote in self.remotes()? {
            let upstream = format!("{}{}/{}", REMOTES_PREFIX, remote, name);
            if self.has_ref(&upstream) {
                let start = format!("{}/{}", remote, name);
                plan.add(&["checkout", "-b", name, "--track", &start]);
                return Ok(plan);
            }
        }

        Err(GitError::NothingToSync(name.to_string()))
    }

    /// Plan a sync of the current branch
    pub fn plan_sync_current(&self, options: SyncOptions) -> Result<SyncPlan> {
        let head = self.head_ref()?;
        self.plan_sync(branch_name(&head), options)
    }
}

/// Remote name of a `refs/remotes/<remote>/<name>` upstream
fn remote_of<'a>(upstream: &'a str, name: &str) -> Option<&'a str> {
    let rest = upstream.strip_prefix(REMOTES_PREFIX)?;
    let (remote, branch) = rest.split_once('/')?;
    (branch == name && !remote.is_empty()).then_some(remote)
}
