//! Polling configuration.

use std::time::Duration;

/// Configuration for waiting on OCR completion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tablescan_lib::poll::PollConfig;
///
/// // 30 status checks, 2 seconds apart
/// let config = PollConfig::default();
///
/// let quick = PollConfig::default()
///     .max_attempts(5)
///     .interval(Duration::from_millis(500));
/// assert_eq!(quick.max_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
    /// Delay between a pending status check and the next poll.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

impl PollConfig {
    /// Sets the maximum number of status checks (at least one).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Sets the delay between attempts.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Worst-case time spent waiting, excluding request latency.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}
