//! Commit execution through the `git` binary.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Run `git commit` in `workdir` with `message` as its own argv element.
///
/// `--cleanup=verbatim` stops git from stripping `#` lines or whitespace, so
/// the recorded message is exactly `message` (git appends a final newline).
pub fn commit_with_message(workdir: &Path, message: &str) -> Result<(), GitError> {
    let git = which::which("git").map_err(|_| GitError::GitNotInstalled)?;

    debug!(workdir = %workdir.display(), "running git commit");
    let output = Command::new(git)
        .current_dir(workdir)
        .args(["commit", "--cleanup=verbatim", "-m", message])
        .output()
        .map_err(|e| GitError::CommitFailed(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(GitError::CommitFailed(detail));
    }

    Ok(())
}
