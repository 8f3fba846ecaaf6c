//! Runtime settings read from the environment.
//!
//! Every knob has a default; invalid values are logged and replaced by the
//! default rather than aborting the run.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::remote::Provider;

pub const OLLAMA_URL_ENV_VAR: &str = "COMMIT_GENIUS_OLLAMA_URL";
pub const OLLAMA_MODEL_ENV_VAR: &str = "COMMIT_GENIUS_OLLAMA_MODEL";
pub const PROVIDER_ENV_VAR: &str = "COMMIT_GENIUS_PROVIDER";
pub const MODEL_ENV_VAR: &str = "COMMIT_GENIUS_MODEL";
pub const API_URL_ENV_VAR: &str = "COMMIT_GENIUS_API_URL";
pub const TIMEOUT_ENV_VAR: &str = "COMMIT_GENIUS_TIMEOUT";
pub const PROBE_TIMEOUT_ENV_VAR: &str = "COMMIT_GENIUS_PROBE_TIMEOUT_MS";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2_000;

/// Settings for the local backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    pub base_url: String,
    pub model: String,
    pub probe_timeout: Duration,
    pub timeout: Duration,
}

/// Settings for the remote backend. The key is resolved separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

/// Everything configurable, gathered once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub local: LocalSettings,
    pub remote: RemoteSettings,
}

impl Settings {
    pub fn from_env() -> Self {
        let timeout = Duration::from_secs(parse_env(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS));
        let probe_timeout =
            Duration::from_millis(parse_env(PROBE_TIMEOUT_ENV_VAR, DEFAULT_PROBE_TIMEOUT_MS));

        let provider: Provider = parse_env(PROVIDER_ENV_VAR, Provider::default());
        let model = string_env(MODEL_ENV_VAR).unwrap_or_else(|| provider.default_model().to_string());
        let endpoint =
            string_env(API_URL_ENV_VAR).unwrap_or_else(|| provider.endpoint().to_string());

        Self {
            local: LocalSettings {
                base_url: string_env(OLLAMA_URL_ENV_VAR)
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: string_env(OLLAMA_MODEL_ENV_VAR)
                    .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                probe_timeout,
                timeout,
            },
            remote: RemoteSettings {
                provider,
                endpoint,
                model,
                timeout,
            },
        }
    }
}

/// Non-empty, trimmed value of an environment variable.
fn string_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, warning and falling back on bad input.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match string_env(name) {
        Some(v) => match v.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", name, v, default);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 7] = [
        OLLAMA_URL_ENV_VAR,
        OLLAMA_MODEL_ENV_VAR,
        PROVIDER_ENV_VAR,
        MODEL_ENV_VAR,
        API_URL_ENV_VAR,
        TIMEOUT_ENV_VAR,
        PROBE_TIMEOUT_ENV_VAR,
    ];

    /// Every setting variable, unset unless listed in `overrides`.
    fn env_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS
            .iter()
            .map(|var| {
                let value = overrides.iter().find(|(k, _)| k == var).map(|(_, v)| *v);
                (*var, value)
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(env_with(&[]), || {
            let settings = Settings::from_env();
            assert_eq!(settings.local.base_url, DEFAULT_OLLAMA_URL);
            assert_eq!(settings.local.model, DEFAULT_OLLAMA_MODEL);
            assert_eq!(settings.local.probe_timeout, Duration::from_secs(2));
            assert_eq!(settings.local.timeout, Duration::from_secs(30));
            assert_eq!(settings.remote.provider, Provider::Together);
            assert_eq!(settings.remote.model, Provider::Together.default_model());
            assert_eq!(settings.remote.endpoint, Provider::Together.endpoint());
        });
    }

    #[test]
    fn test_overrides() {
        let vars = env_with(&[
            (OLLAMA_URL_ENV_VAR, "http://gpu-box:11434/"),
            (OLLAMA_MODEL_ENV_VAR, "codellama"),
            (PROVIDER_ENV_VAR, "openai"),
            (MODEL_ENV_VAR, "gpt-4o-mini"),
            (TIMEOUT_ENV_VAR, "60"),
            (PROBE_TIMEOUT_ENV_VAR, "500"),
        ]);

        temp_env::with_vars(vars, || {
            let settings = Settings::from_env();
            assert_eq!(settings.local.base_url, "http://gpu-box:11434");
            assert_eq!(settings.local.model, "codellama");
            assert_eq!(settings.local.timeout, Duration::from_secs(60));
            assert_eq!(settings.local.probe_timeout, Duration::from_millis(500));
            assert_eq!(settings.remote.provider, Provider::OpenAi);
            assert_eq!(settings.remote.model, "gpt-4o-mini");
            assert_eq!(settings.remote.endpoint, Provider::OpenAi.endpoint());
        });
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let vars = env_with(&[(TIMEOUT_ENV_VAR, "soon"), (PROVIDER_ENV_VAR, "carrier-pigeon")]);

        temp_env::with_vars(vars, || {
            let settings = Settings::from_env();
            assert_eq!(settings.remote.timeout, Duration::from_secs(30));
            assert_eq!(settings.remote.provider, Provider::Together);
        });
    }

    #[test]
    fn test_endpoint_override() {
        let vars = env_with(&[(API_URL_ENV_VAR, "https://proxy.internal/v1/chat/completions")]);

        temp_env::with_vars(vars, || {
            let settings = Settings::from_env();
            assert_eq!(settings.remote.endpoint, "https://proxy.internal/v1/chat/completions");
        });
    }
}
