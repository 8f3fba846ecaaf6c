//! Normalization of raw model output into a single commit subject line.
//!
//! Chat models frequently wrap their answer in a markdown fence, quote it, or
//! add a body after a blank line. The subject line is all we keep.

/// Reduce a raw completion to one trimmed line.
///
/// Steps, in order:
/// 1. Trim surrounding whitespace
/// 2. Unwrap a surrounding ` ``` ` fence (with or without a language tag)
/// 3. Keep the first non-empty line
/// 4. Strip one layer of matching `"`, `'` or `` ` `` around it
///
/// Returns an empty string when nothing is left; the router treats that as a
/// failed generation.
pub fn clean_completion(raw: &str) -> String {
    let trimmed = unwrap_fence(raw.trim());

    let line = trimmed
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    strip_quotes(line).trim().to_string()
}

fn unwrap_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };

    // Drop an optional language tag on the opening fence line
    match body.find('\n') {
        Some(idx) if !body[..idx].trim().contains(' ') => body[idx + 1..].trim(),
        _ => body.trim(),
    }
}

fn strip_quotes(line: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if line.len() >= 2 && line.starts_with(quote) && line.ends_with(quote) {
            return &line[1..line.len() - 1];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message_is_trimmed() {
        assert_eq!(clean_completion("  feat: add x \n"), "feat: add x");
    }

    #[test]
    fn test_fenced_message_is_unwrapped() {
        let raw = "```\nfix(parser): handle empty input\n```";
        assert_eq!(clean_completion(raw), "fix(parser): handle empty input");
    }

    #[test]
    fn test_fence_with_language_tag() {
        let raw = "```text\ndocs: update readme\n```";
        assert_eq!(clean_completion(raw), "docs: update readme");
    }

    #[test]
    fn test_body_after_subject_is_dropped() {
        let raw = "feat(auth): add login\n\nThis adds a login endpoint.";
        assert_eq!(clean_completion(raw), "feat(auth): add login");
    }

    #[test]
    fn test_surrounding_quotes_are_stripped() {
        assert_eq!(clean_completion("\"chore: bump deps\""), "chore: bump deps");
        assert_eq!(clean_completion("`chore: bump deps`"), "chore: bump deps");
    }

    #[test]
    fn test_inner_quotes_are_kept() {
        assert_eq!(
            clean_completion(r#"fix: escape "quoted" names"#),
            r#"fix: escape "quoted" names"#
        );
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(clean_completion(" \n\t \n"), "");
        assert_eq!(clean_completion("```\n```"), "");
    }

    #[test]
    fn test_single_quote_char_is_not_stripped_to_nothing() {
        assert_eq!(clean_completion("\""), "\"");
    }
}
