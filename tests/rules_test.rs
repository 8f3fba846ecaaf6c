//! Rule-based generator behavior over realistic diffs.

mod common;

use commit_genius::rules::{self, CommitKind};
use common::sample_diff;
use regex_lite::Regex;

#[test]
fn test_docs_readme() {
    assert_eq!(rules::generate("+++ b/docs/readme.md"), "docs(readme): update code");
}

#[test]
fn test_added_function() {
    let diff = "+++ b/src/util.js\n+function helper() {}";
    assert_eq!(rules::generate(diff), "feat(util): update code");
}

#[test]
fn test_git_style_new_file() {
    let diff = "diff --git a/tests/parse.rs b/tests/parse.rs\nnew file mode 100644\n--- /dev/null\n+++ b/tests/parse.rs\n@@ -0,0 +1 @@\n+#[test]\n";
    assert_eq!(rules::generate(diff), "test(parse): update code");
}

#[test]
fn test_precedence_test_beats_everything() {
    let diff = [
        sample_diff("src/bugfix.rs", "pub fn repair() {}"),
        sample_diff("docs/guide.md", "text"),
        sample_diff("test/guide.js", "it()"),
    ]
    .concat();

    assert_eq!(rules::classify(&diff), CommitKind::Test);
    assert_eq!(rules::generate(&diff), "test(bugfix): update code");
}

#[test]
fn test_fix_keyword_without_other_signals() {
    let diff = sample_diff("src/parser.rs", "// Bug: off-by-one");
    assert_eq!(rules::generate(&diff), "fix(parser): update code");
}

#[test]
fn test_plain_change_is_chore() {
    let diff = sample_diff("Cargo.toml", "serde = \"1\"");
    assert_eq!(rules::generate(&diff), "chore(Cargo): update code");
}

#[test]
fn test_output_always_matches_conventional_format() {
    let format = Regex::new(r"^\w+(\([\w.-]+\))?: .+$").unwrap();

    let diffs = [
        String::new(),
        "\n\n".to_string(),
        "+++ /dev/null".to_string(),
        "+++ b/.env".to_string(),
        "+++ b/ünïcödé/файл.rs".to_string(),
        "+++ \"b/with space/(weird) name!.txt\"".to_string(),
        "\u{0}\u{7}binary junk\r\n+++ b/x".to_string(),
        sample_diff("a/b/c/d.e.f", "def run():"),
        sample_diff("tests/x.py", "assert True"),
        "-removed only\n".repeat(1000),
    ];

    for diff in &diffs {
        let message = rules::generate(diff);
        assert!(format.is_match(&message), "bad message {message:?} for diff {diff:?}");
    }
}
