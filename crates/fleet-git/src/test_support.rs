//! Fixture repositories shared by the unit tests

use std::path::Path;

use git2::{BranchType, Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

use crate::repository::GitRepo;

pub(crate) fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(name), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let parents: Vec<_> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<_> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// A repository on branch `main` with one commit
pub(crate) fn setup_repo() -> (TempDir, GitRepo) {
    let temp = TempDir::new().unwrap();
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(temp.path(), &opts).unwrap();
    commit_file(&repo, "file.txt", "content", "Initial commit");

    let git_repo = GitRepo::open(temp.path()).unwrap();
    (temp, git_repo)
}

/// Point `refs/remotes/origin/main` at `oid` and make it the upstream of `main`
pub(crate) fn set_upstream(repo: &Repository, oid: Oid) {
    if repo.find_remote("origin").is_err() {
        repo.remote("origin", "https://example.com/project.git").unwrap();
    }
    repo.reference("refs/remotes/origin/main", oid, true, "fixture")
        .unwrap();
    repo.find_branch("main", BranchType::Local)
        .unwrap()
        .set_upstream(Some("origin/main"))
        .unwrap();
}
