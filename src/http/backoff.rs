//! Exponential backoff delays for retry loops

use std::time::Duration;

/// Exponential backoff calculator with optional jitter
///
/// Delay for attempt `n` (zero based) is `base_delay * 2^n`, capped at
/// `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
    /// Jitter percentage (0.0 to 0.5)
    jitter: f64,
}

impl ExponentialBackoff {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            jitter: 0.0,
        }
    }

    /// Create with jitter added on top of each computed delay
    pub fn with_jitter(base_delay: Duration, max_delay: Duration, jitter: f64) -> Self {
        Self {
            base_delay,
            max_delay,
            jitter: jitter.clamp(0.0, 0.5),
        }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Calculate delay for a specific attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // 2^attempt * base_delay
        let multiplier = 2u64.saturating_pow(attempt.min(20));
        let delay_ms = (self.base_delay.as_millis() as u64).saturating_mul(multiplier);
        let delay = Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64));

        if self.jitter > 0.0 {
            let jitter_range = (delay.as_millis() as f64 * self.jitter) as u64;
            delay + Duration::from_millis(rand_jitter(jitter_range))
        } else {
            delay
        }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_secs(30))
    }
}

/// Simple jitter generation without full RNG dependency
fn rand_jitter(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    // Use current time nanoseconds as simple randomness source
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % max
}
