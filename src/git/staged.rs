//! Staged diff collection using git2.

use git2::{Diff, DiffFormat, ErrorCode, Repository, Tree};

use crate::error::GitError;

/// Unified diff of the index against HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDiff {
    pub text: String,
    /// Paths touched by the diff, new path for renames.
    pub paths: Vec<String>,
}

impl StagedDiff {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Resolve the HEAD tree. `Ok(None)` for a repository with no commits yet.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

fn index_diff(repo: &Repository) -> Result<Diff<'_>, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    repo.diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)
}

pub fn has_staged_changes(repo: &Repository) -> Result<bool, GitError> {
    Ok(index_diff(repo)?.deltas().len() > 0)
}

/// Capture the staged changes. Fails with `NoStagedChanges` when the index
/// matches HEAD.
pub fn collect_staged_diff(repo: &Repository) -> Result<StagedDiff, GitError> {
    let diff = index_diff(repo)?;

    let paths: Vec<String> = diff
        .deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
        })
        .collect();

    if paths.is_empty() {
        return Err(GitError::NoStagedChanges);
    }

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if matches!(origin, '+' | '-' | ' ') {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok(StagedDiff { text, paths })
}
