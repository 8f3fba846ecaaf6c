//! Deterministic, offline commit message generation.
//!
//! The last tier of the fallback chain: no I/O, cannot fail.

pub mod classify;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::llm::{Backend, Engine};

pub use classify::{CommitKind, classify, scope};

/// Description used for every rule-based message.
const DESCRIPTION: &str = "update code";

/// Build `type(scope): update code`, or `type: update code` without a scope.
pub fn generate(diff: &str) -> String {
    let kind = classify(diff);
    match scope(diff) {
        Some(scope) => format!("{kind}({scope}): {DESCRIPTION}"),
        None => format!("{kind}: {DESCRIPTION}"),
    }
}

/// The rule-based generator as a backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RulesBackend;

#[async_trait]
impl Backend for RulesBackend {
    fn engine(&self) -> Engine {
        Engine::Rules
    }

    fn label(&self) -> String {
        "rules-based generator".to_string()
    }

    async fn probe(&self) -> bool {
        true
    }

    async fn generate(&self, diff: &str) -> Result<String, GenerationError> {
        Ok(generate(diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_readme_scenario() {
        assert_eq!(generate("+++ b/docs/readme.md"), "docs(readme): update code");
    }

    #[test]
    fn test_feat_scenario() {
        let diff = "+++ b/src/util.js\n+function helper() {}";
        assert_eq!(generate(diff), "feat(util): update code");
    }

    #[test]
    fn test_without_scope() {
        assert_eq!(generate(""), "chore: update code");
    }

    #[tokio::test]
    async fn test_backend_always_available() {
        let backend = RulesBackend;
        assert!(backend.probe().await);
        assert_eq!(backend.engine(), Engine::Rules);
        assert_eq!(backend.generate("").await.unwrap(), "chore: update code");
    }
}
