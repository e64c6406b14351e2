//! Fixed-interval polling.
//!
//! Used for the two bounded waits in the orchestrator: the status loop of
//! `run_to_completion` and the high-resolution result window. Errors from the
//! check end the loop immediately; only "not ready yet" is waited on.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Attempt budget and spacing for a poll loop.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Total checks, including the first.
    pub max_attempts: u32,
    /// Delay between checks (none before the first).
    pub interval: Duration,
    /// Operation name for logging.
    pub operation_name: String,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(15),
            operation_name: "poll".to_string(),
        }
    }
}

impl PollPolicy {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Outcome of a poll loop.
#[derive(Debug)]
pub enum PollResult<T, E> {
    /// The check produced a value.
    Ready(T),
    /// Every attempt reported "not ready".
    Exhausted { attempts: u32 },
    /// The check failed; no further attempts were made.
    Failed(E),
    /// The cancellation token fired while waiting.
    Cancelled,
}

impl<T, E> PollResult<T, E> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollResult::Ready(_))
    }
}

/// Check until it yields `Some`, fails, runs out of attempts or is cancelled.
pub async fn poll_until<F, Fut, T, E>(
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut check: F,
) -> PollResult<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            tokio::select! {
                _ = cancel.cancelled() => return PollResult::Cancelled,
                _ = tokio::time::sleep(policy.interval) => {}
            }
        } else if cancel.is_cancelled() {
            return PollResult::Cancelled;
        }

        match check(attempt).await {
            Ok(Some(value)) => return PollResult::Ready(value),
            Ok(None) => {
                debug!(
                    operation = %policy.operation_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "Not ready, waiting {:?}", policy.interval
                );
            }
            Err(e) => return PollResult::Failed(e),
        }
    }

    PollResult::Exhausted {
        attempts: policy.max_attempts,
    }
}
