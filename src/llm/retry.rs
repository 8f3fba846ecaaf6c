//! Exponential backoff for transient backend failures.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;

/// Configuration: 3 total attempts, base 1s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Whether a failed attempt may be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Give up and return the error.
    No,
    /// Try again, waiting at least the hinted duration if one was given.
    After(Option<Duration>),
}

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `MAX_ATTEMPTS` times. `classify` decides whether
/// an error is worth another attempt; errors classified as [`Retry::No`] are
/// returned immediately. The wait before each retry is the larger of the
/// backoff interval and the error's hint, capped at the max interval.
///
/// The last error is returned unchanged once attempts run out.
pub async fn retry_with_backoff<T, E, Fut, F, C>(mut attempt: F, classify: C) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Retry,
{
    let max_interval = Duration::from_secs(MAX_INTERVAL_SECS);
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval,
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;

    loop {
        attempts += 1;

        let err = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        let hint = match classify(&err) {
            Retry::No => return Err(err),
            Retry::After(hint) => hint,
        };

        if attempts >= MAX_ATTEMPTS {
            return Err(err);
        }

        let wait = backoff
            .next_backoff()
            .unwrap_or(max_interval)
            .max(hint.unwrap_or_default())
            .min(max_interval);
        tokio::time::sleep(wait).await;
    }
}
