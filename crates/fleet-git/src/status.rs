//! Working tree status

use git2::{Status, StatusOptions};

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Whether tracked files match HEAD, in both the index and the work tree.
    ///
    /// Untracked files do not count; see [`GitRepo::has_untracked`].
    pub fn is_clean(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;

        let dirty = Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE
            | Status::WT_MODIFIED
            | Status::WT_DELETED
            | Status::WT_RENAMED
            | Status::WT_TYPECHANGE;

        Ok(!statuses.iter().any(|entry| entry.status().intersects(dirty)))
    }

    /// Whether the work tree has files that are neither tracked nor ignored
    pub fn has_untracked(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts))?;

        Ok(statuses.iter().any(|entry| entry.status().is_wt_new()))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::setup_repo;

    #[test]
    fn test_is_clean() {
        let (_temp, repo) = setup_repo();
        assert!(repo.is_clean().unwrap());
        assert!(!repo.has_untracked().unwrap());
    }

    #[test]
    fn test_untracked_file_keeps_tree_clean() {
        let (temp, repo) = setup_repo();
        std::fs::write(temp.path().join("new_file.txt"), "new").unwrap();
        assert!(repo.is_clean().unwrap());
        assert!(repo.has_untracked().unwrap());
    }

    #[test]
    fn test_modified_file_is_dirty() {
        let (temp, repo) = setup_repo();
        std::fs::write(temp.path().join("file.txt"), "modified").unwrap();
        assert!(!repo.is_clean().unwrap());
    }
}
