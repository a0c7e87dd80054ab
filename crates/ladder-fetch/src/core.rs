//! Pure functions behind the retry loop.

use std::time::Duration;

/// Delay before retrying after attempt `attempt` (0-indexed) failed.
///
/// The schedule is linear: `base * (attempt + 1)`.
///
/// ```
/// use std::time::Duration;
/// use ladder_fetch::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(800)), Duration::from_millis(800));
/// assert_eq!(retry_delay(2, Duration::from_millis(800)), Duration::from_millis(2400));
/// ```
pub fn retry_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(attempt.saturating_add(1))
}

/// Whether a response with `status` is handed back to the caller.
///
/// Server errors and rate limiting (429) are retried; everything else,
/// including other 4xx codes, is accepted as the page payload.
pub fn is_acceptable(status: u16) -> bool { status < 500 && status != 429 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_linear() {
        let base = Duration::from_millis(100);

        assert_eq!(retry_delay(0, base), Duration::from_millis(100));
        assert_eq!(retry_delay(1, base), Duration::from_millis(200));
        assert_eq!(retry_delay(2, base), Duration::from_millis(300));
        assert_eq!(retry_delay(3, base), Duration::from_millis(400));
    }

    #[test]
    fn test_retry_delay_grows_with_attempt() {
        let base = Duration::from_millis(10);
        let delays: Vec<Duration> = (0..5).map(|i| retry_delay(i, base)).collect();

        for pair in delays.windows(2) {
            assert_eq!(pair[1] - pair[0], base);
        }
    }

    #[test]
    fn test_retry_delay_zero_base() {
        let base = Duration::ZERO;
        assert_eq!(retry_delay(0, base), Duration::ZERO);
        assert_eq!(retry_delay(10, base), Duration::ZERO);
    }

    #[test]
    fn test_retry_delay_overflow_protection() {
        let base = Duration::from_secs(u64::MAX / 2);
        assert_eq!(retry_delay(u32::MAX, base), Duration::MAX);
    }

    #[test]
    fn test_is_acceptable() {
        assert!(is_acceptable(200));
        assert!(is_acceptable(204));
        assert!(is_acceptable(404));
        assert!(!is_acceptable(429));
        assert!(!is_acceptable(500));
        assert!(!is_acceptable(503));
    }
}
