use crate::error::{summarize_error, TxError};
use anyhow::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry with a uniformly random pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::mint()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_min: Duration, backoff_max: Duration) -> Self {
        let (backoff_min, backoff_max) = if backoff_min <= backoff_max {
            (backoff_min, backoff_max)
        } else {
            (backoff_max, backoff_min)
        };
        Self {
            max_attempts: max_attempts.max(1),
            backoff_min,
            backoff_max,
        }
    }

    /// Three attempts with a 7-10s pause: the budget for mint calls.
    pub fn mint() -> Self {
        Self::new(3, Duration::from_millis(7_000), Duration::from_millis(10_000))
    }

    /// Exactly one attempt, used for approvals and staking.
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(self, min: Duration, max: Duration) -> Self {
        Self::new(self.max_attempts, min, max)
    }

    /// Random pause in `[backoff_min, backoff_max]`.
    pub fn backoff(&self) -> Duration {
        if self.backoff_max <= self.backoff_min {
            return self.backoff_min;
        }
        let min_ms = self.backoff_min.as_millis() as u64;
        let max_ms = self.backoff_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are used up.
///
/// The closure receives the 1-based attempt number. On exhaustion the last
/// error is summarised into [`TxError::Exhausted`].
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, TxError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                let reason = summarize_error(&e, 100);
                let remaining = policy.max_attempts - attempt;
                if remaining == 0 {
                    return Err(TxError::Exhausted {
                        operation: operation_name.to_string(),
                        attempts: policy.max_attempts,
                        reason,
                    });
                }

                let delay = policy.backoff();
                warn!(
                    target: "workflow",
                    "    ⚠️ {} failed ({}). Retry ({} left) in {:.1}s...",
                    operation_name,
                    reason,
                    remaining,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_policy_defaults() {
        let policy = RetryPolicy::mint();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_min, Duration::from_secs(7));
        assert_eq!(policy.backoff_max, Duration::from_secs(10));
    }

    #[test]
    fn test_backoff_within_range() {
        let policy = RetryPolicy::mint();
        for _ in 0..200 {
            let d = policy.backoff();
            assert!(d >= Duration::from_secs(7) && d <= Duration::from_secs(10));
        }
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::single().with_max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_inverted_backoff_range_is_normalized() {
        let policy = RetryPolicy::new(2, Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(policy.backoff_min, Duration::from_secs(1));
        assert_eq!(policy.backoff_max, Duration::from_secs(5));
    }
}
