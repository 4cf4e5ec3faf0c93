//! Retry policy for comment generation attempts.
//!
//! Every failed attempt is retried until the attempt budget runs out. The wait
//! between attempts is fixed by default; exponential backoff is available
//! behind the same `(max_attempts, delay)` pair.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for any single backoff wait.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How the wait grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay after every failure
    #[default]
    Constant,
    /// `delay * 2^(attempt - 1)`, capped at 30 seconds
    Exponential,
}

/// Attempt budget and wait schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Base delay between attempts
    pub delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            backoff: Backoff::Constant,
        }
    }
}

impl RetryPolicy {
    /// Fixed-delay policy.
    pub fn constant(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Constant,
        }
    }

    /// Whether another attempt follows `attempt` (1-based).
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait after failed `attempt` (1-based) before the next one.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Constant => self.delay,
            Backoff::Exponential => backoff_duration(attempt.saturating_sub(1), self.delay),
        }
    }
}

/// Calculate exponential backoff duration for a given zero-based retry index.
///
/// Uses `base_delay * 2^retry` with a cap at 30 seconds.
pub fn backoff_duration(retry: u32, base_delay: Duration) -> Duration {
    let base_ms = u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX);
    let delay = base_ms.saturating_mul(2u64.saturating_pow(retry));
    Duration::from_millis(delay).min(MAX_BACKOFF)
}
