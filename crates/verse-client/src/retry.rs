use std::future::Future;
use std::time::Duration;

use rand::Rng;
use sanctuary_core::config::RetryConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{AttemptError, RetryError};

// ─── RetryPolicy ──────────────────────────────────────────────────────────

/// Backoff policy for one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. `0` is treated as `1`.
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Cap applied to the exponential part, before jitter.
    pub max_delay: Duration,
    /// Upper bound (exclusive) of the random delay added to each backoff.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
            jitter: Duration::from_millis(cfg.jitter_ms),
        }
    }
}

impl RetryPolicy {
    /// `min(max_delay, base_delay * 2^attempt)`, without jitter.
    ///
    /// `attempt` is 0 for the wait after the first failure.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Backoff plus a uniform sample from `[0, jitter)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff(attempt) + self.sample_jitter()
    }

    fn sample_jitter(&self) -> Duration {
        let bound = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if bound == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..bound))
    }
}

// ─── execute_with_retry ───────────────────────────────────────────────────

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// `op` receives the 1-based attempt number. Attempts are strictly
/// sequential and the backoff sleep only suspends this future, so other
/// tasks keep running. Cancelling `cancel` abandons the sequence at once,
/// whether an attempt or a sleep is pending.
pub async fn execute_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        debug!(attempt, max_attempts, "sending request");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            r = op(attempt) => r,
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !err.is_retryable() {
            debug!(attempt, error = %err, "not retrying");
            return Err(RetryError::Rejected(err));
        }
        if attempt >= max_attempts {
            warn!(attempts = attempt, error = %err, "retries exhausted");
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: err,
            });
        }

        let delay = policy.delay_for(attempt - 1);
        let delay_ms = delay.as_millis() as u64;
        if err == AttemptError::RateLimited {
            warn!(attempt, delay_ms, "rate limited, backing off");
        } else {
            warn!(attempt, delay_ms, error = %err, "request failed, retrying");
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
