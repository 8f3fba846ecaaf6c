//! API key lookup and persistence.
//!
//! Lookup order:
//! 1. `COMMIT_GENIUS_API_KEY` environment variable
//! 2. `~/.commit-genius` JSON file (`{"apiKey": "..."}`), owner read/write only
//! 3. Interactive password prompt, optionally saved back to the file

use std::env;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CredentialError;

/// Environment variable holding the remote API key.
pub const API_KEY_ENV_VAR: &str = "COMMIT_GENIUS_API_KEY";

/// File name of the credential file in the home directory.
const CREDENTIAL_FILE_NAME: &str = ".commit-genius";

/// A secret API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw secret, for building request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

/// Where a key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    File,
    Prompt,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Interactive source of a key, for the last lookup step.
#[cfg_attr(test, mockall::automock)]
pub trait SecretPrompt {
    /// Ask for a key. `Ok(None)` when the user entered nothing.
    fn ask_key(&self) -> Result<Option<String>, CredentialError>;

    /// Ask whether the entered key should be saved for future runs.
    fn confirm_save(&self) -> Result<bool, CredentialError>;
}

/// Terminal prompt backed by dialoguer.
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn ask_key(&self) -> Result<Option<String>, CredentialError> {
        eprintln!("API key not found ({} is unset and no saved key exists)", API_KEY_ENV_VAR);
        let key = dialoguer::Password::new()
            .with_prompt("Enter your API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;

        let key = key.trim().to_string();
        Ok((!key.is_empty()).then_some(key))
    }

    fn confirm_save(&self) -> Result<bool, CredentialError> {
        dialoguer::Confirm::new()
            .with_prompt("Save API key for future use?")
            .default(true)
            .interact()
            .map_err(|e| CredentialError::Prompt(e.to_string()))
    }
}

/// Default credential file location, `~/.commit-genius`.
pub fn default_credential_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CREDENTIAL_FILE_NAME))
}

/// Resolve the API key using the documented lookup order.
///
/// `path` is the credential file (skipped when `None`); `prompt` is consulted
/// only when both earlier sources came up empty.
pub fn resolve_api_key(
    path: Option<&Path>,
    prompt: Option<&dyn SecretPrompt>,
) -> Result<Option<(ApiKey, KeySource)>, CredentialError> {
    resolve(path, prompt, false)
}

/// Like [`resolve_api_key`], but an unreadable or malformed credential file
/// is logged and skipped instead of failing the lookup.
pub fn resolve_api_key_lenient(
    path: Option<&Path>,
    prompt: Option<&dyn SecretPrompt>,
) -> Result<Option<(ApiKey, KeySource)>, CredentialError> {
    resolve(path, prompt, true)
}

fn resolve(
    path: Option<&Path>,
    prompt: Option<&dyn SecretPrompt>,
    skip_bad_file: bool,
) -> Result<Option<(ApiKey, KeySource)>, CredentialError> {
    if let Ok(key) = env::var(API_KEY_ENV_VAR) {
        let key = key.trim();
        if !key.is_empty() {
            debug!("using API key from {}", API_KEY_ENV_VAR);
            return Ok(Some((ApiKey::new(key), KeySource::Environment)));
        }
    }

    let from_file = match path.map(read_key_file).transpose() {
        Ok(key) => key.flatten(),
        Err(e) if skip_bad_file => {
            warn!("{e}; ignoring the credential file");
            None
        }
        Err(e) => return Err(e),
    };

    if let Some(path) = path
        && let Some(key) = from_file
    {
        debug!(path = %path.display(), "using API key from credential file");
        return Ok(Some((key, KeySource::File)));
    }

    let Some(prompt) = prompt else {
        return Ok(None);
    };

    let Some(key) = prompt.ask_key()? else {
        return Ok(None);
    };

    if let Some(path) = path
        && prompt.confirm_save()?
    {
        save_key_file(path, &key)?;
    }

    Ok(Some((ApiKey::new(key), KeySource::Prompt)))
}

/// Read the key from a credential file. A missing file or missing field is
/// `Ok(None)`.
pub fn read_key_file(path: &Path) -> Result<Option<ApiKey>, CredentialError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CredentialError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    warn_if_shared(path);

    let file: CredentialFile =
        serde_json::from_str(&contents).map_err(|source| CredentialError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    Ok(file
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(ApiKey::new))
}

/// Atomically write the key to `path` with owner-only permissions.
pub fn save_key_file(path: &Path, key: &str) -> Result<(), CredentialError> {
    let write_err = |source: std::io::Error| CredentialError::Write {
        path: path.display().to_string(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;

    let body = serde_json::to_string_pretty(&CredentialFile {
        api_key: Some(key.to_string()),
    })
    .map_err(|e| write_err(std::io::Error::other(e)))?;

    tmp.write_all(body.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    restrict_permissions(tmp.path()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn warn_if_shared(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = fs::metadata(path)
        && meta.permissions().mode() & 0o077 != 0
    {
        warn!(
            "credential file {} is readable by other users; run `chmod 600` on it",
            path.display()
        );
    }
}

#[cfg(not(unix))]
fn warn_if_shared(_path: &Path) {}
