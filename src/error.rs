//! Error types for commit-genius modules using thiserror.

use std::fmt;

use thiserror::Error;

use crate::llm::Engine;

/// Errors from the version-control collaborator.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository. Run commit-genius from within a git repository.")]
    NotARepository,

    #[error("No staged changes found. Use `git add <files>` to stage changes.")]
    NoStagedChanges,

    #[error("git executable not found in PATH")]
    GitNotInstalled,

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to commit: {0}")]
    CommitFailed(String),
}

/// Why a single backend could not produce a message.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Unavailable(String),

    #[error("no API key configured (set COMMIT_GENIUS_API_KEY or run with --cloud to enter one)")]
    MissingCredentials,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("rate limited{}", retry_after.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    #[error("backend returned an empty message")]
    EmptyOutput,
}

impl BackendError {
    /// Whether this error means the credential is missing or was rejected.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            BackendError::MissingCredentials | BackendError::AuthenticationFailed(_)
        )
    }
}

/// A backend failure tagged with the backend that produced it.
#[derive(Error, Debug)]
#[error("{backend} failed: {cause}")]
pub struct GenerationError {
    pub backend: Engine,
    #[source]
    pub cause: BackendError,
}

impl GenerationError {
    pub fn new(backend: Engine, cause: BackendError) -> Self {
        Self { backend, cause }
    }
}

/// Selection engine failure.
#[derive(Debug)]
pub enum RouterError {
    /// A forced mode was requested and its only backend failed.
    Forced(GenerationError),
    /// Every tier of the automatic chain failed.
    Exhausted(Vec<GenerationError>),
}

impl RouterError {
    /// The backend error behind a forced-mode failure.
    pub fn cause(&self) -> Option<&BackendError> {
        match self {
            RouterError::Forced(err) => Some(&err.cause),
            RouterError::Exhausted(_) => None,
        }
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::Forced(err) => write!(f, "{}", err),
            RouterError::Exhausted(failures) => {
                let details: Vec<String> = failures.iter().map(|e| e.to_string()).collect();
                write!(f, "No backend produced a commit message. {}", details.join("; "))
            }
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::Forced(err) => Some(err),
            RouterError::Exhausted(_) => None,
        }
    }
}

/// Errors from credential lookup and persistence.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read credential file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save credential file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("API key prompt failed: {0}")]
    Prompt(String),
}

/// Errors from the accept/edit/cancel menu.
#[derive(Error, Debug)]
pub enum InteractError {
    #[error("Terminal prompt failed: {0}")]
    Prompt(String),

    #[error("Edited commit message is empty")]
    EmptyMessage,
}
