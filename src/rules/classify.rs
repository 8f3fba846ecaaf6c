//! Diff signal detection for the rule-based generator.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

static TEST_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s/])tests?/").expect("Invalid regex"));

static DOCS_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s/])docs?/").expect("Invalid regex"));

static ADDED_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+\s*(?:export\s+)?(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:function|fn|def)\b")
        .expect("Invalid regex")
});

static FIX_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:fix|bug)").expect("Invalid regex"));

/// Commit type inferred from a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    Test,
    Docs,
    Feat,
    Fix,
    Chore,
}

impl CommitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitKind::Test => "test",
            CommitKind::Docs => "docs",
            CommitKind::Feat => "feat",
            CommitKind::Fix => "fix",
            CommitKind::Chore => "chore",
        }
    }
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the commit type by the first signal present, in precedence order:
/// tests directory, docs directory, added function, fix/bug keyword.
pub fn classify(diff: &str) -> CommitKind {
    let lines: Vec<&str> = diff.lines().collect();

    if lines.iter().any(|l| TEST_DIR.is_match(l)) {
        CommitKind::Test
    } else if lines.iter().any(|l| DOCS_DIR.is_match(l)) {
        CommitKind::Docs
    } else if lines
        .iter()
        .any(|l| !l.starts_with("+++") && ADDED_FUNCTION.is_match(l))
    {
        CommitKind::Feat
    } else if lines.iter().any(|l| FIX_KEYWORD.is_match(l)) {
        CommitKind::Fix
    } else {
        CommitKind::Chore
    }
}

/// Scope from the first file header line: the file name up to its first `.`.
pub fn scope(diff: &str) -> Option<String> {
    let path = diff.lines().find_map(header_path)?;

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name.split('.').next().unwrap_or("");

    let scope: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    (!scope.is_empty()).then_some(scope)
}

/// Path named by a `--- a/...` or `+++ b/...` line, ignoring `/dev/null`.
fn header_path(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("+++ ")
        .or_else(|| line.strip_prefix("--- "))?;

    let path = rest.trim().trim_matches('"');
    if path.is_empty() || path == "/dev/null" {
        return None;
    }

    Some(
        path.strip_prefix("a/")
            .or_else(|| path.strip_prefix("b/"))
            .unwrap_or(path),
    )
}
