//! Exponential backoff shared by provider calls and daemon notifications.

use std::time::Duration;

/// First retry waits this long; each further attempt doubles it.
const BASE_DELAY_MS: u64 = 100;
/// Upper bound for a single backoff delay.
const MAX_DELAY_MS: u64 = 10_000;
/// Upper bound for a server-requested `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 30;

/// Backoff before retry number `attempt + 1`: 100ms, 200ms, 400ms, ... capped at 10s.
pub fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = BASE_DELAY_MS
        .saturating_mul(1_u64 << capped_attempt)
        .min(MAX_DELAY_MS);
    Duration::from_millis(delay_ms)
}

/// Honour a `Retry-After` hint (capped at 30s), else fall back to [`backoff_delay`].
pub fn retry_after_or_backoff(retry_after: Option<u64>, attempt: u32) -> Duration {
    match retry_after {
        Some(secs) => Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS)),
        None => backoff_delay(attempt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(10_000));
    }

    #[test]
    fn retry_after_is_capped() {
        assert_eq!(retry_after_or_backoff(Some(5), 0), Duration::from_secs(5));
        assert_eq!(retry_after_or_backoff(Some(600), 0), Duration::from_secs(30));
        assert_eq!(retry_after_or_backoff(None, 2), Duration::from_millis(400));
    }
}
