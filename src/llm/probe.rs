//! Availability probing.
//!
//! Probes answer "can this backend serve a request right now?" without ever
//! failing: every transport error is reported as unavailable.

use std::time::Duration;

use tracing::debug;

use crate::credentials::ApiKey;

/// Issue a `GET` to `url` and report whether it answered with a 2xx status.
pub async fn http_alive(client: &reqwest::Client, url: &str, timeout: Duration) -> bool {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            debug!(url, status = %response.status(), "liveness probe returned non-success");
            false
        }
        Err(e) => {
            debug!(url, error = %e, "liveness probe failed");
            false
        }
    }
}

/// Remote backends are available whenever a credential is present.
pub fn credentials_present(key: Option<&ApiKey>) -> bool {
    key.is_some_and(|k| !k.expose().trim().is_empty())
}
