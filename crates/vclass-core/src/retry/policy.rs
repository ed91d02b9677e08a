use std::time::Duration;

/// How the wait between attempts evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Same delay after every failed attempt.
    Fixed(Duration),
    /// `initial` after the first failure, doubling after each further one.
    /// `max`, when set, bounds a single wait; otherwise only overflow saturates.
    Exponential {
        initial: Duration,
        max: Option<Duration>,
    },
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop; the attempt budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Attempt cap plus delay schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). The first attempt
    /// always runs; config loading rejects 0.
    pub max_attempts: u32,
    pub schedule: Schedule,
}

impl Default for RetryPolicy {
    /// 3 attempts, 5 seconds apart.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(5))
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            schedule: Schedule::Fixed(delay),
        }
    }

    pub fn exponential(max_attempts: u32, initial: Duration, max: Option<Duration>) -> Self {
        Self {
            max_attempts,
            schedule: Schedule::Exponential { initial, max },
        }
    }

    /// 5 attempts starting at 1 second, uncapped.
    pub fn default_backoff() -> Self {
        Self::exponential(5, Duration::from_secs(1), None)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.schedule {
            Schedule::Fixed(d) => d,
            Schedule::Exponential { initial, max } => {
                let delay = match 1u32.checked_shl(attempt.saturating_sub(1)) {
                    Some(factor) => initial.saturating_mul(factor),
                    None => Duration::MAX,
                };
                max.map_or(delay, |cap| delay.min(cap))
            }
        }
    }

    /// Decide what to do after failed attempt number `attempt` (1-based).
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_after(attempt))
    }
}
