use std::time::Duration;

/// Resilience policy for model calls: attempt ceiling, randomized
/// exponential backoff bounds, and the fixed courtesy delay observed
/// after each successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (not a retry count).
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    pub courtesy_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            courtesy_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy with no waiting at all, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            courtesy_delay: Duration::ZERO,
        }
    }

    /// Wait before retry number `attempt` (1-based), drawn from the
    /// expanding window `min ..= min(min * 2^attempt, max)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let min_ms = self.min_backoff.as_millis() as u64;
        let max_ms = self.max_backoff.as_millis() as u64;
        let upper_ms = min_ms
            .saturating_mul(1u64 << attempt.min(20))
            .min(max_ms)
            .max(min_ms);
        let span = upper_ms - min_ms;
        // Jitter from current time nanoseconds (avoids a rand dependency)
        let jitter_ms = if span == 0 {
            0
        } else {
            (std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .subsec_nanos() as u64)
                % (span + 1)
        };
        Duration::from_millis(min_ms + jitter_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_run_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 6);
        assert_eq!(policy.min_backoff, Duration::from_secs(1));
        assert_eq!(policy.max_backoff, Duration::from_secs(60));
        assert_eq!(policy.courtesy_delay, Duration::from_secs(1));
    }

    #[test]
    fn backoff_stays_within_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 1..=10 {
            let delay = policy.backoff_delay(attempt);
            assert!(delay >= policy.min_backoff, "attempt {attempt}: {delay:?}");
            assert!(delay <= policy.max_backoff, "attempt {attempt}: {delay:?}");
        }
    }

    #[test]
    fn early_attempts_bounded_by_expanding_window() {
        let policy = RetryPolicy {
            max_attempts: 6,
            min_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            courtesy_delay: Duration::ZERO,
        };
        // Window for attempt 1 is 100..=200ms.
        let delay = policy.backoff_delay(1);
        assert!(delay >= Duration::from_millis(100));
        assert!(delay <= Duration::from_millis(200));
    }

    #[test]
    fn zero_bounds_yield_zero_delay() {
        let policy = RetryPolicy::immediate(3);
        assert_eq!(policy.backoff_delay(1), Duration::ZERO);
        assert_eq!(policy.backoff_delay(30), Duration::ZERO);
    }

    #[test]
    fn large_attempt_does_not_overflow() {
        let policy = RetryPolicy::default();
        let delay = policy.backoff_delay(u32::MAX);
        assert!(delay <= policy.max_backoff);
    }
}
