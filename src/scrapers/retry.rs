use std::time::Duration;

/// Retry schedule shared by session creation and page navigation.
///
/// Session creation uses an exponential schedule (base delay doubling per
/// attempt); navigation uses a fixed short delay. One policy type covers
/// both so the retry loops cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Doubling backoff: base, 2*base, 4*base, ...
    pub fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            backoff_multiplier: 2,
        }
    }

    /// The same delay between every attempt.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            backoff_multiplier: 1,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delays_double_per_attempt() {
        let policy = RetryPolicy::exponential(4, Duration::from_secs(2));
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after(3), Duration::from_secs(8));
    }

    #[test]
    fn fixed_delays_stay_constant() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1500));
        assert_eq!(policy.delay_after(1), Duration::from_millis(1500));
        assert_eq!(policy.delay_after(3), Duration::from_millis(1500));
    }
}
