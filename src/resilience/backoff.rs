//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Calculate the delay before retry number `attempt` (1-based).
///
/// `base_ms * 2^(attempt - 1)` plus a uniform jitter in `[0, max_jitter_ms)`.
/// Attempt 0 means "no retry yet" and yields no delay.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_jitter_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    let jitter = if max_jitter_ms > 0 {
        rand::thread_rng().gen_range(0..max_jitter_ms)
    } else {
        0
    };

    Duration::from_millis(delay_ms.saturating_add(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let b1 = calculate_backoff(1, 3000, 500);
        assert!(b1.as_millis() >= 3000 && b1.as_millis() < 3500);

        let b2 = calculate_backoff(2, 3000, 500);
        assert!(b2.as_millis() >= 6000 && b2.as_millis() < 6500);

        let b5 = calculate_backoff(5, 3000, 500);
        assert!(b5.as_millis() >= 48_000 && b5.as_millis() < 48_500);
    }

    #[test]
    fn test_no_jitter_is_exact() {
        assert_eq!(calculate_backoff(3, 100, 0), Duration::from_millis(400));
        assert_eq!(calculate_backoff(0, 100, 500), Duration::ZERO);
    }

    #[test]
    fn test_large_attempts_saturate() {
        let d = calculate_backoff(200, u64::MAX / 2, 0);
        assert_eq!(d, Duration::from_millis(u64::MAX));
    }
}
