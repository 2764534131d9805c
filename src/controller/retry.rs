use std::time::Duration;

/// How the poller reacts to status checks that fail in transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive failures tolerated before polling gives up.
    /// `None` keeps retrying forever.
    pub max_consecutive_failures: Option<u32>,
    /// Base delay for exponential backoff after a failure.
    pub backoff_base: Duration,
    /// Upper bound for the backoff delay.
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_failures: Some(5),
            backoff_base: Duration::from_millis(2000),
            backoff_max: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Backoff after the `failures`-th consecutive failure.
    /// delay = min(backoff_base * 2^(failures - 1), backoff_max)
    pub fn delay_for_failure(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(16);
        self.backoff_base
            .saturating_mul(1u32 << exponent)
            .min(self.backoff_max)
    }

    /// Delay before the next check given the regular polling interval.
    /// Never shorter than the interval.
    pub fn next_delay(&self, interval: Duration, failures: u32) -> Duration {
        if failures == 0 {
            interval
        } else {
            self.delay_for_failure(failures).max(interval)
        }
    }

    pub fn is_exhausted(&self, failures: u32) -> bool {
        self.max_consecutive_failures
            .is_some_and(|max| failures > max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_backoff_is_capped() {
        let policy = RetryPolicy {
            max_consecutive_failures: Some(10),
            backoff_base: Duration::from_millis(1000),
            backoff_max: Duration::from_millis(5000),
        };
        assert_eq!(policy.delay_for_failure(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_failure(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_failure(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for_failure(4), Duration::from_millis(5000));
        assert_eq!(policy.delay_for_failure(40), Duration::from_millis(5000));
    }

    #[test]
    fn next_delay_never_undercuts_interval() {
        let policy = RetryPolicy {
            backoff_base: Duration::from_millis(500),
            ..Default::default()
        };
        let interval = Duration::from_millis(2000);
        assert_eq!(policy.next_delay(interval, 0), interval);
        assert_eq!(policy.next_delay(interval, 1), interval);
        assert_eq!(policy.next_delay(interval, 4), Duration::from_millis(4000));
    }

    #[test]
    fn bounded_policy_exhausts_after_limit() {
        let policy = RetryPolicy {
            max_consecutive_failures: Some(2),
            ..Default::default()
        };
        assert!(!policy.is_exhausted(1));
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
    }

    #[test]
    fn unbounded_policy_never_exhausts() {
        let policy = RetryPolicy {
            max_consecutive_failures: None,
            ..Default::default()
        };
        assert!(!policy.is_exhausted(u32::MAX));
    }
}
