use std::time::Duration;

/// Fixed-delay, bounded reconnect policy.
///
/// The counter increments on every closure that triggers a retry and resets
/// to zero on every successful open. Once the ceiling is reached, automatic
/// retry stops until the caller explicitly reconnects.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    delay: Duration,
    ceiling: u32,
    attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(delay: Duration, ceiling: u32) -> Self {
        Self {
            delay,
            ceiling,
            attempts: 0,
        }
    }

    /// Delay before the next attempt, or `None` when the ceiling is reached.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.ceiling {
            return None;
        }
        self.attempts += 1;
        Some(self.delay)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.ceiling
    }

    /// Reset the counter (successful open or explicit caller reconnect)
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_yields_fixed_delay_up_to_ceiling() {
        let mut policy = ReconnectPolicy::new(Duration::from_millis(3000), 3);

        for attempt in 1..=3 {
            assert_eq!(policy.next_delay(), Some(Duration::from_millis(3000)));
            assert_eq!(policy.attempts(), attempt);
        }

        assert_eq!(policy.next_delay(), None);
        assert!(policy.is_exhausted());
    }

    #[test]
    fn test_reset_reopens_the_budget() {
        let mut policy = ReconnectPolicy::new(Duration::from_millis(100), 1);
        assert!(policy.next_delay().is_some());
        assert!(policy.next_delay().is_none());

        policy.reset();
        assert!(!policy.is_exhausted());
        assert!(policy.next_delay().is_some());
    }

    #[test]
    fn test_zero_ceiling_never_retries() {
        let mut policy = ReconnectPolicy::new(Duration::from_millis(100), 0);
        assert_eq!(policy.next_delay(), None);
        assert!(policy.is_exhausted());
    }
}
