//! Prompt construction shared by the networked backends.

use serde::Serialize;

/// Maximum characters of diff text sent to a model.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Fixed system instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert developer assistant that generates conventional commit messages. \
Format your response as \"<type>(<scope>): <description>\" without any additional text or explanation. \
Use common types like feat, fix, docs, style, refactor, test, chore, etc. \
Keep the message concise, clear, and descriptive.";

/// Build the user message for a staged diff.
///
/// The diff is stripped of control characters and cut to
/// [`MAX_DIFF_LENGTH`] characters; a note is appended when it was cut.
pub fn build_user_prompt(diff: &str) -> String {
    let (sanitized, truncated) = sanitize_diff(diff, MAX_DIFF_LENGTH);

    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    format!("Generate a conventional commit message for the following git diff:\n\n{sanitized}{truncation_note}")
}

/// One chat turn, as both Ollama and OpenAI-style APIs accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// The system + user turns for a staged diff.
pub fn chat_messages(diff: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: SYSTEM_INSTRUCTION.to_string(),
        },
        ChatMessage {
            role: "user",
            content: build_user_prompt(diff),
        },
    ]
}

/// Remove control characters (except newline and tab) and truncate on a char
/// boundary. Returns the text and whether it was truncated.
pub fn sanitize_diff(text: &str, max_chars: usize) -> (String, bool) {
    let mut result = String::with_capacity(text.len().min(max_chars));
    let mut count = 0usize;

    for ch in text.chars() {
        if ch.is_control() && ch != '\n' && ch != '\t' {
            continue;
        }
        if count == max_chars {
            return (result, true);
        }
        result.push(ch);
        count += 1;
    }

    (result, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_diff() {
        let prompt = build_user_prompt("+++ b/src/main.rs\n+fn main() {}");
        assert!(prompt.contains("+fn main() {}"));
        assert!(!prompt.contains("truncated"));
    }

    #[test]
    fn test_control_chars_removed() {
        let (clean, truncated) = sanitize_diff("a\x1b[31mb\x00c\n\td", 100);
        assert_eq!(clean, "a[31mbc\n\td");
        assert!(!truncated);
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let text = "é".repeat(10);
        let (clean, truncated) = sanitize_diff(&text, 4);
        assert_eq!(clean, "éééé");
        assert!(truncated);
    }

    #[test]
    fn test_exact_length_is_not_truncated() {
        let (clean, truncated) = sanitize_diff("abcd", 4);
        assert_eq!(clean, "abcd");
        assert!(!truncated);
    }

    #[test]
    fn test_large_diff_gets_truncation_note() {
        let diff = "+x\n".repeat(MAX_DIFF_LENGTH);
        let prompt = build_user_prompt(&diff);
        assert!(prompt.ends_with("Focus on the visible changes."));
    }

    #[test]
    fn test_chat_messages_order() {
        let messages = chat_messages("+x");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("+x"));
    }

    #[test]
    fn test_system_instruction_requests_conventional_format() {
        assert!(SYSTEM_INSTRUCTION.contains("<type>(<scope>): <description>"));
    }
}
