//! Bounded retry for fallible async operations
//!
//! Used for both the NuGet download and the restore command. The combinator
//! never inspects the error it receives; it only counts attempts.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times an operation is retried and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries beyond the first attempt
    pub max_attempts: u32,

    /// Delay before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// One retry after a one second pause
    pub const fn download() -> Self {
        Self::new(1, Duration::from_secs(1))
    }

    /// One immediate retry
    pub const fn restore() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Total number of attempts, including the first
    pub fn total_attempts(&self) -> u32 {
        self.max_attempts.saturating_add(1)
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// The closure receives the 0-based attempt index. A warning naming the
/// failed attempt is logged before every retry; the error of the last
/// attempt is returned unchanged.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts => {
                warn!(
                    "{} attempt {} failed: {}, retrying...",
                    label,
                    attempt + 1,
                    e
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
