//! commit-genius - A CLI tool that writes conventional commit messages for staged changes.
//!
//! # Overview
//!
//! commit-genius reads the staged diff, asks a local Ollama model, a hosted
//! API, or a built-in rule set (in that order, falling back as each one is
//! unavailable) for a one-line conventional commit message, and commits it
//! once the user accepts or edits it.

pub mod config;
pub mod credentials;
pub mod error;
pub mod git;
pub mod interact;
pub mod llm;
pub mod ollama;
pub mod remote;
pub mod rules;

// Re-export commonly used types
pub use config::Settings;
pub use credentials::{ApiKey, KeySource};
pub use error::{BackendError, CredentialError, GenerationError, GitError, InteractError, RouterError};
pub use git::{GitRepo, StagedDiff, VersionControl};
pub use interact::Decision;
pub use llm::{Backend, Engine, GenerationRequest, GenerationResult, LlmRouter, Mode};
pub use ollama::OllamaBackend;
pub use remote::{Provider, RemoteBackend};
pub use rules::RulesBackend;
