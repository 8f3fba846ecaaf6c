//! Accept, edit, or discard the suggested message.

use crate::error::InteractError;

/// Menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Use,
    Edit,
    Cancel,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Use, Choice::Edit, Choice::Cancel];

    pub fn label(&self) -> &'static str {
        match self {
            Choice::Use => "Use this message",
            Choice::Edit => "Edit message",
            Choice::Cancel => "Cancel",
        }
    }
}

/// Outcome of the review step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Commit(String),
    Cancel,
}

/// User-facing prompts used during review.
#[cfg_attr(test, mockall::automock)]
pub trait Reviewer {
    fn choose(&self) -> Result<Choice, InteractError>;

    /// Ask for a replacement message, prefilled with `suggestion`.
    fn edit(&self, suggestion: &str) -> Result<String, InteractError>;
}

/// Reviewer backed by dialoguer.
pub struct TerminalReviewer;

impl Reviewer for TerminalReviewer {
    fn choose(&self) -> Result<Choice, InteractError> {
        let labels: Vec<&str> = Choice::ALL.iter().map(Choice::label).collect();
        let index = dialoguer::Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| InteractError::Prompt(e.to_string()))?;

        Ok(Choice::ALL.get(index).copied().unwrap_or(Choice::Cancel))
    }

    fn edit(&self, suggestion: &str) -> Result<String, InteractError> {
        dialoguer::Input::<String>::new()
            .with_prompt("Commit message")
            .with_initial_text(suggestion)
            .interact_text()
            .map_err(|e| InteractError::Prompt(e.to_string()))
    }
}

/// Run the menu for `suggestion`. An edited message is returned exactly as
/// typed; only an all-whitespace edit is rejected.
pub fn review(reviewer: &dyn Reviewer, suggestion: &str) -> Result<Decision, InteractError> {
    match reviewer.choose()? {
        Choice::Use => Ok(Decision::Commit(suggestion.to_string())),
        Choice::Edit => {
            let edited = reviewer.edit(suggestion)?;
            if edited.trim().is_empty() {
                return Err(InteractError::EmptyMessage);
            }
            Ok(Decision::Commit(edited))
        }
        Choice::Cancel => Ok(Decision::Cancel),
    }
}
