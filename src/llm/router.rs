//! Backend selection and fallback orchestration.
//!
//! The router walks an ordered list of tiers, strictly one at a time:
//!
//! ```text
//! Auto:         local -> remote -> rules
//! ForceLocal:   local
//! ForceRemote:  remote
//! ```
//!
//! Each tier is probed, then asked to generate. In automatic mode a failed or
//! unavailable tier is recorded and the walk advances; the rules tier cannot
//! fail, so the walk always ends with a message. In forced modes the first
//! failure is returned as-is.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{BackendError, GenerationError, RouterError};

use super::backend::{Backend, GenerationRequest, GenerationResult, Mode};
use super::retry::{Retry, retry_with_backoff};

/// Tiered backend router.
pub struct LlmRouter {
    local: Box<dyn Backend>,
    remote: Box<dyn Backend>,
    rules: Box<dyn Backend>,
}

impl LlmRouter {
    pub fn new(local: Box<dyn Backend>, remote: Box<dyn Backend>, rules: Box<dyn Backend>) -> Self {
        Self {
            local,
            remote,
            rules,
        }
    }

    /// The backends tried for `mode`, in order.
    fn tiers(&self, mode: Mode) -> Vec<&dyn Backend> {
        match mode {
            Mode::Auto => vec![self.local.as_ref(), self.remote.as_ref(), self.rules.as_ref()],
            Mode::ForceLocal => vec![self.local.as_ref()],
            Mode::ForceRemote => vec![self.remote.as_ref()],
        }
    }

    /// Produce exactly one commit message for the request, or fail.
    pub async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResult, RouterError> {
        let forced = request.mode.is_forced();
        let mut fallbacks = Vec::new();

        for backend in self.tiers(request.mode) {
            let engine = backend.engine();

            debug!(%engine, "probing backend");
            if !backend.probe().await {
                let err = GenerationError::new(engine, backend.unavailable());
                if forced {
                    return Err(RouterError::Forced(err));
                }
                warn!("{err}; trying next backend");
                fallbacks.push(err);
                continue;
            }

            debug!(%engine, "generating commit message");
            let attempt = if forced {
                retry_with_backoff(|| generate_checked(backend, request.diff), classify).await
            } else {
                generate_checked(backend, request.diff).await
            };

            match attempt {
                Ok(message) => {
                    return Ok(GenerationResult {
                        message,
                        engine,
                        label: backend.label(),
                        fallbacks,
                    });
                }
                Err(err) if forced => return Err(RouterError::Forced(err)),
                Err(err) => {
                    warn!("{err}; trying next backend");
                    fallbacks.push(err);
                }
            }
        }

        Err(RouterError::Exhausted(fallbacks))
    }
}

/// Run one generation and reject blank output.
async fn generate_checked(backend: &dyn Backend, diff: &str) -> Result<String, GenerationError> {
    let message = backend.generate(diff).await?;
    let message = message.trim();

    if message.is_empty() {
        return Err(GenerationError::new(backend.engine(), BackendError::EmptyOutput));
    }

    Ok(message.to_string())
}

/// Only rate limiting is worth repeating; everything else is surfaced.
fn classify(err: &GenerationError) -> Retry {
    match err.cause {
        BackendError::RateLimited { retry_after } => {
            Retry::After(retry_after.map(Duration::from_secs))
        }
        _ => Retry::No,
    }
}
