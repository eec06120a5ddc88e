//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Retry delay policy: `base_delay * 2^attempt` plus a uniformly random
/// jitter in `[0, exponential / 2]`.
///
/// The deterministic component strictly increases with the attempt number,
/// and because the jitter bound is half the exponential component the full
/// delay range for attempt `n + 1` sits strictly above the range for
/// attempt `n`.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    base_delay: Duration,
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// Deterministic component of the delay after `attempt` (0-based) failed.
    fn exponential_ms(&self, attempt: u32) -> u64 {
        let base_ms = self.base_delay.as_millis().min(u128::from(u64::MAX)) as u64;
        base_ms.saturating_mul(2u64.saturating_pow(attempt))
    }

    /// Delay to sleep before retrying after `attempt` (0-based) failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponential = self.exponential_ms(attempt);
        let jitter_bound = exponential / 2;
        let jitter = if jitter_bound > 0 {
            rand::thread_rng().gen_range(0..=jitter_bound)
        } else {
            0
        };
        Duration::from_millis(exponential.saturating_add(jitter))
    }
}
