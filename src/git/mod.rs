//! Version-control operations: staged diff capture and commit.
//!
//! Reads go through git2; the commit itself shells out to the `git` binary so
//! hooks, signing and identity configuration behave as they would for a
//! manual `git commit`.

pub mod commit;
pub mod staged;

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::GitError;

pub use commit::commit_with_message;
pub use staged::{StagedDiff, collect_staged_diff};

/// Operations the interaction layer needs from the repository.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Whether the working directory is inside a non-bare repository.
    fn is_repository(&self) -> bool;

    /// Whether the index differs from HEAD.
    fn has_staged_changes(&self) -> Result<bool, GitError>;

    /// Unified diff of the index against HEAD.
    fn staged_diff(&self) -> Result<StagedDiff, GitError>;

    /// Record the staged changes with `message`, passed to git unmodified.
    fn commit(&self, message: &str) -> Result<(), GitError>;
}

/// Repository discovered from a starting directory.
#[derive(Debug, Clone)]
pub struct GitRepo {
    start: PathBuf,
}

impl GitRepo {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
        }
    }

    pub fn start(&self) -> &Path {
        &self.start
    }

    fn open(&self) -> Result<Repository, GitError> {
        let repo = Repository::discover(&self.start).map_err(|_| GitError::NotARepository)?;
        if repo.is_bare() {
            return Err(GitError::NotARepository);
        }
        Ok(repo)
    }

    fn workdir(&self) -> Result<PathBuf, GitError> {
        self.open()?
            .workdir()
            .map(Path::to_path_buf)
            .ok_or(GitError::NotARepository)
    }
}

impl VersionControl for GitRepo {
    fn is_repository(&self) -> bool {
        self.open().is_ok()
    }

    fn has_staged_changes(&self) -> Result<bool, GitError> {
        let repo = self.open()?;
        staged::has_staged_changes(&repo)
    }

    fn staged_diff(&self) -> Result<StagedDiff, GitError> {
        let repo = self.open()?;
        collect_staged_diff(&repo)
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        commit_with_message(&self.workdir()?, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitRepo::new(dir.path());
        assert!(!git.is_repository());
        assert!(matches!(git.has_staged_changes(), Err(GitError::NotARepository)));
    }

    #[test]
    fn test_subdirectory_discovers_repository() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let git = GitRepo::new(&nested);
        assert!(git.is_repository());
        assert_eq!(git.start(), nested.as_path());
    }

    #[test]
    fn test_bare_repository_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init_bare(dir.path()).unwrap();
        assert!(!GitRepo::new(dir.path()).is_repository());
    }
}
