//! Fleet Git - repository inspection helpers
//!
//! Read-only queries over a checkout (references, upstreams, ahead/behind
//! counts, clean/dirty state) plus the git command lines used to sync a
//! branch with its upstream.

mod commits;
pub mod refs;
mod remote;
mod repository;
mod status;
pub mod sync;
pub mod types;

#[cfg(test)]
mod test_support;

pub use refs::branch_name;
pub use remote::{display_command, git_command, git_output, run_git};
pub use repository::{GitRepo, Result};
pub use sync::{SyncOptions, SyncPlan};
pub use types::{CommitSummary, Divergence};
