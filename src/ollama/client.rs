//! Ollama HTTP client implementing the backend contract.
//!
//! Liveness is `GET /api/tags`; generation is a non-streaming
//! `POST /api/chat` returning `{"message": {"content": "..."}}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LocalSettings;
use crate::error::{BackendError, GenerationError};
use crate::llm::probe::http_alive;
use crate::llm::{Backend, ChatMessage, Engine, chat_messages, clean_completion};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Backend talking to a local Ollama instance.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    probe_timeout: Duration,
}

impl OllamaBackend {
    /// Build a backend whose generation requests time out after
    /// `settings.timeout`.
    pub fn new(settings: &LocalSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            probe_timeout: settings.probe_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn chat(&self, diff: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: chat_messages(diff),
            stream: false,
        };

        debug!(url, model = %self.model, "sending chat request to Ollama");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Server {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let text = response.text().await.map_err(BackendError::Transport)?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::MalformedResponse(format!("{e}")))?;

        Ok(clean_completion(&parsed.message.content))
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    fn engine(&self) -> Engine {
        Engine::Local
    }

    fn label(&self) -> String {
        format!("local Ollama ({})", self.model)
    }

    async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        http_alive(&self.client, &url, self.probe_timeout).await
    }

    fn unavailable(&self) -> BackendError {
        BackendError::Unavailable(format!("Ollama is not available at {}", self.base_url))
    }

    async fn generate(&self, diff: &str) -> Result<String, GenerationError> {
        self.chat(diff)
            .await
            .map_err(|cause| GenerationError::new(Engine::Local, cause))
    }
}
