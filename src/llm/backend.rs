//! The uniform contract every generation backend satisfies.

use std::fmt;

use async_trait::async_trait;

use crate::error::{BackendError, GenerationError};

/// Which tier of the fallback chain a backend occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Local,
    Remote,
    Rules,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Local => "local",
            Engine::Remote => "remote",
            Engine::Rules => "rules",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the selection engine picks backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Local, then remote, then rules.
    #[default]
    Auto,
    /// Local only; never falls back.
    ForceLocal,
    /// Remote only; never falls back.
    ForceRemote,
}

impl Mode {
    pub fn is_forced(&self) -> bool {
        !matches!(self, Mode::Auto)
    }
}

/// One commit-message request.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub diff: &'a str,
    pub mode: Mode,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(diff: &'a str, mode: Mode) -> Self {
        Self { diff, mode }
    }
}

/// The message produced for a request and where it came from.
#[derive(Debug)]
pub struct GenerationResult {
    pub message: String,
    pub engine: Engine,
    /// Human-readable backend description, e.g. `local Ollama (llama2)`.
    pub label: String,
    /// Failures of earlier tiers that were skipped over, in order.
    pub fallbacks: Vec<GenerationError>,
}

/// A commit-message generation backend.
///
/// Implementations are constructed by the caller and handed to
/// [`LlmRouter`](super::LlmRouter); they hold configuration only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// The tier this backend occupies.
    fn engine(&self) -> Engine;

    /// Human-readable description for display.
    fn label(&self) -> String;

    /// Cheap availability check. Never fails; errors mean "unavailable".
    async fn probe(&self) -> bool;

    /// The error reported when [`probe`](Backend::probe) returned false.
    fn unavailable(&self) -> BackendError {
        BackendError::Unavailable(format!("{} is not available", self.label()))
    }

    /// Summarize a staged diff into a commit message.
    async fn generate(&self, diff: &str) -> Result<String, GenerationError>;
}
