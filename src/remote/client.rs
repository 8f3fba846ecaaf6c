//! Hosted-API client implementing the backend contract.
//!
//! The client never retries; it classifies failures so the router can decide
//! between retrying, falling back, and aborting:
//!
//! | Status | Error |
//! |---|---|
//! | 401, 403 | `AuthenticationFailed` |
//! | 429 | `RateLimited` (with `Retry-After` seconds) |
//! | other non-2xx | `Server` |

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RemoteSettings;
use crate::credentials::ApiKey;
use crate::error::{BackendError, GenerationError};
use crate::llm::probe::credentials_present;
use crate::llm::{Backend, ChatMessage, Engine, chat_messages, clean_completion};

use super::provider::{Provider, ResponseShape};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 100;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    output: CompletionOutput,
}

#[derive(Deserialize)]
struct CompletionOutput {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Backend calling a hosted provider with a bearer token.
pub struct RemoteBackend {
    client: reqwest::Client,
    provider: Provider,
    endpoint: String,
    model: String,
    api_key: Option<ApiKey>,
}

impl RemoteBackend {
    /// Build a backend. With `api_key` absent the backend reports itself
    /// unavailable and never touches the network.
    pub fn new(settings: &RemoteSettings, api_key: Option<ApiKey>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            provider: settings.provider,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    async fn complete(&self, diff: &str) -> Result<String, BackendError> {
        let key = match &self.api_key {
            Some(key) if credentials_present(Some(key)) => key,
            _ => return Err(BackendError::MissingCredentials),
        };

        let body = CompletionRequest {
            model: &self.model,
            messages: chat_messages(diff),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = %self.model,
            "sending completion request"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key.expose())
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after, &body));
        }

        let text = response.text().await.map_err(BackendError::Transport)?;
        let content = extract_content(self.provider.shape(), &text)?;

        Ok(clean_completion(&content))
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    fn engine(&self) -> Engine {
        Engine::Remote
    }

    fn label(&self) -> String {
        format!("{} ({})", self.provider.display_name(), self.model)
    }

    async fn probe(&self) -> bool {
        credentials_present(self.api_key.as_ref())
    }

    fn unavailable(&self) -> BackendError {
        BackendError::MissingCredentials
    }

    async fn generate(&self, diff: &str) -> Result<String, GenerationError> {
        self.complete(diff)
            .await
            .map_err(|cause| GenerationError::new(Engine::Remote, cause))
    }
}

/// Map a non-success status to the error kind the router acts on.
pub fn classify_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> BackendError {
    let message = error_message(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BackendError::AuthenticationFailed(if message.is_empty() {
                "invalid API key".to_string()
            } else {
                message
            })
        }
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited { retry_after },
        _ => BackendError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull `error.message` out of a provider error body, or fall back to the
/// raw body (truncated).
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    body.trim().chars().take(200).collect()
}

/// Read the generated text out of a successful response body.
pub fn extract_content(shape: ResponseShape, body: &str) -> Result<String, BackendError> {
    let malformed = |e: serde_json::Error| BackendError::MalformedResponse(e.to_string());

    let content = match shape {
        ResponseShape::Chat => {
            let parsed: ChatResponse = serde_json::from_str(body).map_err(malformed)?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
        }
        ResponseShape::Completion => {
            let parsed: CompletionResponse = serde_json::from_str(body).map_err(malformed)?;
            parsed.output.choices.into_iter().next().map(|c| c.text)
        }
    };

    content.ok_or_else(|| BackendError::MalformedResponse("response contained no choices".to_string()))
}
